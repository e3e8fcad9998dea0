//! Order archive view.

use chrono::{DateTime, Utc};
use common::{ItemStatus, LineItemId, Money, OrderId, OrderStatus};
use order_store::{LineItem, Order};
use serde::Serialize;

/// One drink line in an archived order.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveLine {
    pub item_id: LineItemId,
    pub drink_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub status: ItemStatus,
}

/// An order in the archive list.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveEntry {
    pub order_id: OrderId,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub item_count: usize,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ArchiveLine>,
}

/// Computes the archive from a snapshot, newest orders first,
/// optionally filtered by status.
pub fn compute(
    orders: &[Order],
    items: &[LineItem],
    status: Option<OrderStatus>,
) -> Vec<ArchiveEntry> {
    let mut entries: Vec<ArchiveEntry> = orders
        .iter()
        .filter(|o| status.is_none_or(|s| o.status == s))
        .map(|o| {
            let lines: Vec<ArchiveLine> = items
                .iter()
                .filter(|i| i.order_id == o.id)
                .map(|i| ArchiveLine {
                    item_id: i.id,
                    drink_name: i.drink_name.clone(),
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    status: i.status,
                })
                .collect();
            ArchiveEntry {
                order_id: o.id,
                customer_name: o.customer_name.clone(),
                status: o.status,
                total_amount: o.total_amount,
                item_count: lines.len(),
                created_at: o.created_at,
                items: lines,
            }
        })
        .collect();
    entries.sort_by_key(|e| std::cmp::Reverse(e.created_at));
    entries
}
