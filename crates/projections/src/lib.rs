//! Read-side views over the order store.
//!
//! The write side emits a change event for every row it touches. This
//! crate listens on that feed and keeps an in-memory snapshot of the
//! order tables fresh, then derives views from the snapshot on demand:
//! - [`views::kitchen`]: pending orders with their items, for the barista board
//! - [`views::archive`]: all orders newest first, filterable by status
//! - [`views::sales`]: aggregate counts and revenue over completed orders

pub mod error;
pub mod refresher;
pub mod views;

pub use error::{ProjectionError, Result};
pub use refresher::{Snapshot, ViewRefresher};
pub use views::archive::{ArchiveEntry, ArchiveLine};
pub use views::kitchen::{KitchenLine, KitchenTicket};
pub use views::sales::{DrinkSales, SalesReport};
