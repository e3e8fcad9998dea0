//! Projection error types.

use thiserror::Error;

/// Errors that can occur while refreshing views.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An error occurred in the order store.
    #[error("Order store error: {0}")]
    Store(#[from] order_store::StoreError),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
