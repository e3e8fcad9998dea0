//! Domain error types.

use order_store::StoreError;
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the order store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A business rule was violated.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),
}
