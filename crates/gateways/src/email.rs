//! Confirmation email gateway.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use order_store::Preorder;
use serde::Serialize;

use crate::error::GatewayError;

/// Trait for sending pre-order confirmation emails.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Sends a collection confirmation for a pre-order to its customer.
    async fn send_confirmation(&self, preorder: &Preorder) -> Result<(), GatewayError>;
}

/// The template variables the email provider substitutes.
#[derive(Debug, Serialize)]
struct ConfirmationPayload<'a> {
    to: &'a str,
    name: &'a str,
    pickup_time: &'a str,
    drinks: Vec<String>,
}

fn drink_lines(preorder: &Preorder) -> Vec<String> {
    preorder
        .drinks
        .iter()
        .map(|d| format!("{} x {}", d.quantity, d.drink_name))
        .collect()
}

/// Email gateway backed by an HTTP email provider.
pub struct HttpEmailGateway {
    client: reqwest::Client,
    endpoint: String,
    api_token: String,
}

impl HttpEmailGateway {
    /// Creates a gateway posting to the given provider endpoint.
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_token: api_token.into(),
        }
    }
}

#[async_trait]
impl EmailGateway for HttpEmailGateway {
    #[tracing::instrument(skip(self, preorder), fields(preorder_id = %preorder.id))]
    async fn send_confirmation(&self, preorder: &Preorder) -> Result<(), GatewayError> {
        let payload = ConfirmationPayload {
            to: &preorder.email,
            name: &preorder.name,
            pickup_time: &preorder.pickup_time,
            drinks: drink_lines(preorder),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Email(format!(
                "provider returned {status}: {body}"
            )));
        }

        metrics::counter!("confirmation_emails_sent").increment(1);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryEmailState {
    sent: Vec<(String, String)>,
    fail_on_send: bool,
}

/// In-memory email gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmailGateway {
    state: Arc<RwLock<InMemoryEmailState>>,
}

impl InMemoryEmailGateway {
    /// Creates a new in-memory email gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail on the next send call.
    pub fn set_fail_on_send(&self, fail: bool) {
        self.state.write().unwrap().fail_on_send = fail;
    }

    /// Returns the number of confirmations sent.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Returns the recipient addresses of sent confirmations.
    pub fn recipients(&self) -> Vec<String> {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .map(|(to, _)| to.clone())
            .collect()
    }
}

#[async_trait]
impl EmailGateway for InMemoryEmailGateway {
    async fn send_confirmation(&self, preorder: &Preorder) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_send {
            return Err(GatewayError::Email("provider unavailable".to_string()));
        }

        state
            .sent
            .push((preorder.email.clone(), drink_lines(preorder).join(", ")));
        Ok(())
    }
}
