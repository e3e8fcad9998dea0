//! Row types for the three backing tables.

use chrono::{DateTime, Utc};
use common::{Customizations, ItemStatus, LineItemId, Money, OrderId, OrderStatus, PreorderId};
use serde::{Deserialize, Serialize};

/// A drink line within a pre-order.
///
/// Pre-order drinks are frozen at submission: the name carries any
/// customizations (e.g. "Oat Latte") and the unit price is the price
/// that was quoted, discount included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreorderDrink {
    pub drink_id: String,
    pub drink_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl PreorderDrink {
    /// Returns the total price for this line (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A pre-order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preorder {
    pub id: PreorderId,
    pub name: String,
    pub email: String,
    pub pickup_time: String,
    pub drinks: Vec<PreorderDrink>,
    pub total_price: Money,
    pub is_collected: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new pre-order. The store assigns id,
/// created_at, and the collected flag.
#[derive(Debug, Clone)]
pub struct NewPreorder {
    pub name: String,
    pub email: String,
    pub pickup_time: String,
    pub drinks: Vec<PreorderDrink>,
    pub total_price: Money,
}

/// A live order row (parent of line items).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: Option<String>,
    /// Frozen total computed at submission time. Never recomputed from
    /// the line items afterwards.
    pub total_amount: Money,
    pub status: OrderStatus,
    /// Set when this order was derived from a collected pre-order.
    pub source_preorder_id: Option<PreorderId>,
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a new live order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: Option<String>,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub source_preorder_id: Option<PreorderId>,
}

/// A line item row belonging to a live order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub order_id: OrderId,
    pub drink_id: String,
    pub drink_name: String,
    pub quantity: u32,
    pub customizations: Customizations,
    /// Unit price as calculated when the order was placed.
    pub unit_price: Money,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

impl LineItem {
    /// Returns the total price for this item (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Fields for inserting a new line item.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub order_id: OrderId,
    pub drink_id: String,
    pub drink_name: String,
    pub quantity: u32,
    pub customizations: Customizations,
    pub unit_price: Money,
    pub status: ItemStatus,
}
