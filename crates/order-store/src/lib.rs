//! Persistence layer for the café order system.
//!
//! Three tables back the whole system: `preorders`, `live_orders`, and
//! `live_order_items`. The [`OrderStore`] trait covers every read and
//! write the domain layer performs, and every successful write is
//! announced on a broadcast change feed so read models can refetch.

pub mod change;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod records;
pub mod store;

pub use change::{ChangeEvent, ChangeKind, TableKind};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use records::{LineItem, NewLineItem, NewOrder, NewPreorder, Order, Preorder, PreorderDrink};
pub use store::{OrderStore, OrderStoreExt};
