//! Domain layer for the café order system.
//!
//! This crate provides the business rules:
//! - Drink catalog with per-drink customization capabilities
//! - Channel-aware pricing engine
//! - Customization normalizer (requests are clamped, never rejected)
//! - Order operations over an [`order_store::OrderStore`]

pub mod catalog;
pub mod customization;
pub mod error;
pub mod order;
pub mod pricing;

pub use catalog::{DRINKS, Drink, DrinkCategory, find_drink};
pub use customization::{display_name, normalize};
pub use error::DomainError;
pub use order::{DraftItem, OrderError, OrderService};
pub use pricing::{
    Channel, OAT_MILK_SURCHARGE, SPECIALTY_PREORDER_DISCOUNT, SYRUP_SURCHARGE, unit_price,
};
