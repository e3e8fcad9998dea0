//! Change feed payloads.
//!
//! Every successful write is announced on a `tokio::sync::broadcast`
//! channel. Consumers treat any event as "refetch everything" rather
//! than patching state incrementally, so the payload only says which
//! table changed and how.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The table a change happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Preorders,
    LiveOrders,
    LiveOrderItems,
}

impl TableKind {
    /// Returns the table name as it appears in the schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Preorders => "preorders",
            TableKind::LiveOrders => "live_orders",
            TableKind::LiveOrderItems => "live_order_items",
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of write that happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A single change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: TableKind,
    pub kind: ChangeKind,
    /// Primary key of the affected row.
    pub row_id: Uuid,
}

impl ChangeEvent {
    pub fn new(table: TableKind, kind: ChangeKind, row_id: Uuid) -> Self {
        Self {
            table,
            kind,
            row_id,
        }
    }
}
