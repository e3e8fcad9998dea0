//! Order operations.

pub mod draft;
pub mod service;

pub use draft::DraftItem;
pub use service::OrderService;

use common::{LineItemId, OrderId, PreorderId};
use thiserror::Error;

/// Business rule violations for order operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// An order must contain at least one item.
    #[error("An order must contain at least one item")]
    NoItems,

    /// A pre-order must contain at least one drink.
    #[error("A pre-order must contain at least one drink")]
    NoDrinks,

    /// Quantity must be at least one.
    #[error("Invalid quantity {quantity} for drink {drink_id}")]
    InvalidQuantity { drink_id: String, quantity: u32 },

    /// The drink ID is not on the menu.
    #[error("Unknown drink: {0}")]
    UnknownDrink(String),

    /// The order was not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The line item was not found.
    #[error("Line item not found: {0}")]
    ItemNotFound(LineItemId),

    /// The pre-order was not found.
    #[error("Pre-order not found: {0}")]
    PreorderNotFound(PreorderId),

    /// The pre-order has already been collected.
    #[error("Pre-order {0} has already been collected")]
    AlreadyCollected(PreorderId),

    /// The pre-order has not been collected.
    #[error("Pre-order {0} has not been collected")]
    NotCollected(PreorderId),
}
