//! Sales report view.
//!
//! Revenue counts completed line items, not completed orders: a drink
//! rung off on the kitchen board is sold even while its parent order
//! is still open at the till.

use std::collections::HashMap;

use common::{ItemStatus, Money, OrderStatus};
use order_store::{LineItem, Order};
use serde::Serialize;

/// Per-drink sales totals across completed items.
#[derive(Debug, Clone, Serialize)]
pub struct DrinkSales {
    pub drink_id: String,
    pub drink_name: String,
    pub quantity: u32,
    pub gross: Money,
}

/// Aggregate sales figures.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub order_count: usize,
    pub pending_count: usize,
    pub completed_count: usize,
    pub revenue: Money,
    pub items_sold: u32,
    /// Best sellers first.
    pub by_drink: Vec<DrinkSales>,
}

/// Computes the sales report from a snapshot.
///
/// Order counts are by order status; revenue, items sold, and the
/// per-drink breakdown sum `quantity x unit_price` over items with
/// status completed.
pub fn compute(orders: &[Order], items: &[LineItem]) -> SalesReport {
    let pending_count = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Pending)
        .count();
    let completed_count = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .count();

    let mut by_drink: HashMap<&str, DrinkSales> = HashMap::new();
    let mut revenue = Money::zero();
    let mut items_sold = 0u32;
    for item in items {
        if item.status != ItemStatus::Completed {
            continue;
        }
        let subtotal = item.unit_price.multiply(item.quantity);
        revenue = revenue + subtotal;
        items_sold += item.quantity;
        by_drink
            .entry(item.drink_id.as_str())
            .and_modify(|s| {
                s.quantity += item.quantity;
                s.gross = s.gross + subtotal;
            })
            .or_insert_with(|| DrinkSales {
                drink_id: item.drink_id.clone(),
                drink_name: item.drink_name.clone(),
                quantity: item.quantity,
                gross: subtotal,
            });
    }

    let mut by_drink: Vec<DrinkSales> = by_drink.into_values().collect();
    by_drink.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.drink_id.cmp(&b.drink_id)));

    SalesReport {
        order_count: orders.len(),
        pending_count,
        completed_count,
        revenue,
        items_sold,
        by_drink,
    }
}
