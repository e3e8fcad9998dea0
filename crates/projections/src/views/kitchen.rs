//! Kitchen board view.
//!
//! Shows only orders still being worked on, oldest first, so the next
//! ticket to make is always at the top of the board.

use chrono::{DateTime, Utc};
use common::{Customizations, ItemStatus, LineItemId, OrderId, OrderStatus};
use order_store::{LineItem, Order};
use serde::Serialize;

/// One drink line on a kitchen ticket.
#[derive(Debug, Clone, Serialize)]
pub struct KitchenLine {
    pub item_id: LineItemId,
    pub drink_name: String,
    pub quantity: u32,
    pub customizations: Customizations,
    pub status: ItemStatus,
}

/// A pending order as shown on the kitchen board.
#[derive(Debug, Clone, Serialize)]
pub struct KitchenTicket {
    pub order_id: OrderId,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<KitchenLine>,
}

/// Computes the kitchen board from a snapshot of orders and items.
///
/// Only pending orders appear. Tickets are oldest first and each
/// ticket's lines keep their insertion order. An order without a
/// customer name shows as "Guest".
pub fn compute(orders: &[Order], items: &[LineItem]) -> Vec<KitchenTicket> {
    let mut tickets: Vec<KitchenTicket> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .map(|o| KitchenTicket {
            order_id: o.id,
            customer_name: o
                .customer_name
                .clone()
                .unwrap_or_else(|| "Guest".to_string()),
            created_at: o.created_at,
            items: items
                .iter()
                .filter(|i| i.order_id == o.id)
                .map(|i| KitchenLine {
                    item_id: i.id,
                    drink_name: i.drink_name.clone(),
                    quantity: i.quantity,
                    customizations: i.customizations,
                    status: i.status,
                })
                .collect(),
        })
        .collect();
    tickets.sort_by_key(|t| t.created_at);
    tickets
}
