//! Outbound integrations.
//!
//! Each gateway is a trait with an HTTP implementation for production
//! and an in-memory implementation for tests. The in-memory ones record
//! what they were asked to do and can be told to fail.

pub mod auth;
pub mod contact;
pub mod email;
pub mod error;

pub use auth::{AuthProvider, Sha256AuthProvider, StaticAuthProvider, sha256_hex};
pub use contact::{ContactGateway, ContactMessage, HttpContactGateway, InMemoryContactGateway};
pub use email::{EmailGateway, HttpEmailGateway, InMemoryEmailGateway};
pub use error::GatewayError;
