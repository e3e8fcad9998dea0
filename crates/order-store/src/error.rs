use thiserror::Error;

use common::{LineItemId, OrderId, PreorderId};

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The order was not found in the store.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The line item was not found in the store.
    #[error("Line item not found: {0}")]
    ItemNotFound(LineItemId),

    /// The pre-order was not found in the store.
    #[error("Pre-order not found: {0}")]
    PreorderNotFound(PreorderId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
