//! HTTP route handlers.

pub mod contact;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod preorders;
pub mod views;
