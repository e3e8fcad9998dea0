//! Gateway error types.

use thiserror::Error;

/// Errors from outbound integrations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The email provider rejected or failed the send.
    #[error("Email gateway error: {0}")]
    Email(String),

    /// The contact relay rejected or failed the message.
    #[error("Contact gateway error: {0}")]
    Contact(String),

    /// The outbound HTTP request itself failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
