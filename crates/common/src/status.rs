//! Order and line item lifecycle statuses.

use serde::{Deserialize, Serialize};

/// The status of a live order.
///
/// Status transitions:
/// ```text
/// Pending ◄──► Completed
/// ```
///
/// Completion is reversible: the archive screen can revert a completed
/// order back to pending, which puts it back on the kitchen queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order is on the kitchen queue.
    #[default]
    Pending,

    /// Every item has been made and the order is archived.
    Completed,
}

impl OrderStatus {
    /// Returns true if the order can be completed from this status.
    pub fn can_complete(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if the order can be reverted to pending from this status.
    pub fn can_revert(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }

    /// Parses a stored status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "completed" => Some(OrderStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The status of a single line item.
///
/// Items toggle freely between the two statuses from the kitchen screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Item has not been made yet.
    #[default]
    Pending,

    /// Item has been made.
    Completed,
}

impl ItemStatus {
    /// Returns the opposite status.
    pub fn toggled(&self) -> Self {
        match self {
            ItemStatus::Pending => ItemStatus::Completed,
            ItemStatus::Completed => ItemStatus::Pending,
        }
    }

    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Completed => "completed",
        }
    }

    /// Parses a stored status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ItemStatus::Pending),
            "completed" => Some(ItemStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
