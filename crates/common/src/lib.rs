//! Shared types for the café order system.
//!
//! Identifier newtypes, money amounts, lifecycle status enums, and the
//! drink customization value object used by every other crate.

pub mod customizations;
pub mod money;
pub mod status;
pub mod types;

pub use customizations::Customizations;
pub use money::Money;
pub use status::{ItemStatus, OrderStatus};
pub use types::{LineItemId, OrderId, PreorderId};
