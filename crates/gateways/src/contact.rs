//! Contact form relay.
//!
//! Messages from the public contact form are relayed to an external
//! form service as a form-urlencoded POST. Nothing is stored locally.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// A message submitted through the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub enquiry_type: Option<String>,
    pub message: String,
}

/// Trait for relaying contact messages.
#[async_trait]
pub trait ContactGateway: Send + Sync {
    /// Relays a contact message to the configured destination.
    async fn relay(&self, message: &ContactMessage) -> Result<(), GatewayError>;
}

/// Contact gateway posting form-urlencoded to an external form service.
pub struct HttpContactGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpContactGateway {
    /// Creates a gateway relaying to the given form endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ContactGateway for HttpContactGateway {
    #[tracing::instrument(skip(self, message))]
    async fn relay(&self, message: &ContactMessage) -> Result<(), GatewayError> {
        let mut fields = vec![
            ("name", message.name.as_str()),
            ("email", message.email.as_str()),
            ("message", message.message.as_str()),
        ];
        if let Some(phone) = &message.phone {
            fields.push(("phone", phone.as_str()));
        }
        if let Some(enquiry_type) = &message.enquiry_type {
            fields.push(("enquiry_type", enquiry_type.as_str()));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .form(&fields)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(GatewayError::Contact(format!(
                "form service returned {status}"
            )));
        }

        metrics::counter!("contact_messages_relayed").increment(1);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryContactState {
    relayed: Vec<ContactMessage>,
    fail_on_relay: bool,
}

/// In-memory contact gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactGateway {
    state: Arc<RwLock<InMemoryContactState>>,
}

impl InMemoryContactGateway {
    /// Creates a new in-memory contact gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail on the next relay call.
    pub fn set_fail_on_relay(&self, fail: bool) {
        self.state.write().unwrap().fail_on_relay = fail;
    }

    /// Returns the number of relayed messages.
    pub fn relayed_count(&self) -> usize {
        self.state.read().unwrap().relayed.len()
    }

    /// Returns the relayed messages.
    pub fn relayed(&self) -> Vec<ContactMessage> {
        self.state.read().unwrap().relayed.clone()
    }
}

#[async_trait]
impl ContactGateway for InMemoryContactGateway {
    async fn relay(&self, message: &ContactMessage) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_relay {
            return Err(GatewayError::Contact("form service down".to_string()));
        }

        state.relayed.push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: None,
            enquiry_type: Some("general".to_string()),
            message: "Do you do decaf?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_relayed_message() {
        let gateway = InMemoryContactGateway::new();
        gateway.relay(&message()).await.unwrap();

        assert_eq!(gateway.relayed_count(), 1);
        assert_eq!(gateway.relayed()[0].email, "sam@example.com");
    }

    #[tokio::test]
    async fn test_fail_on_relay() {
        let gateway = InMemoryContactGateway::new();
        gateway.set_fail_on_relay(true);

        let result = gateway.relay(&message()).await;
        assert!(matches!(result, Err(GatewayError::Contact(_))));
        assert_eq!(gateway.relayed_count(), 0);
    }
}
