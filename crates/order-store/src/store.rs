use async_trait::async_trait;
use tokio::sync::broadcast;

use common::{ItemStatus, LineItemId, OrderId, OrderStatus, PreorderId};

use crate::change::ChangeEvent;
use crate::records::{LineItem, NewLineItem, NewOrder, NewPreorder, Order, Preorder};
use crate::Result;

/// Core trait for order store implementations.
///
/// Covers the three backing tables plus the change feed. All
/// implementations must be thread-safe (Send + Sync). Writes are
/// single-row operations; the domain layer sequences them and
/// compensates when a multi-step write fails partway.
#[async_trait]
pub trait OrderStore: Send + Sync {
    // -- Pre-orders --

    /// Inserts a new pre-order and returns the stored row.
    async fn insert_preorder(&self, new: NewPreorder) -> Result<Preorder>;

    /// Retrieves a pre-order by ID. Returns None if it doesn't exist.
    async fn get_preorder(&self, id: PreorderId) -> Result<Option<Preorder>>;

    /// Lists all pre-orders, newest first.
    async fn list_preorders(&self) -> Result<Vec<Preorder>>;

    /// Sets the collected flag on a pre-order.
    ///
    /// Fails with `PreorderNotFound` if no row matches.
    async fn set_preorder_collected(&self, id: PreorderId, collected: bool) -> Result<()>;

    // -- Live orders --

    /// Inserts a new live order and returns the stored row.
    async fn insert_order(&self, new: NewOrder) -> Result<Order>;

    /// Retrieves an order by ID. Returns None if it doesn't exist.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Lists all live orders, oldest first.
    async fn list_orders(&self) -> Result<Vec<Order>>;

    /// Updates the status of an order.
    ///
    /// Fails with `OrderNotFound` if no row matches.
    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<()>;

    /// Deletes an order row.
    ///
    /// Fails with `OrderNotFound` if no row matches. Line items must be
    /// deleted first; the foreign key rejects orphaning deletes.
    async fn delete_order(&self, id: OrderId) -> Result<()>;

    /// Finds the live order derived from a given pre-order, if any.
    async fn find_order_by_source_preorder(&self, id: PreorderId) -> Result<Option<Order>>;

    // -- Line items --

    /// Inserts line items atomically and returns the stored rows.
    ///
    /// Either every item is inserted or none are.
    async fn insert_line_items(&self, items: Vec<NewLineItem>) -> Result<Vec<LineItem>>;

    /// Retrieves a line item by ID. Returns None if it doesn't exist.
    async fn get_line_item(&self, id: LineItemId) -> Result<Option<LineItem>>;

    /// Lists the line items of one order, oldest first.
    async fn list_items_for_order(&self, order_id: OrderId) -> Result<Vec<LineItem>>;

    /// Lists every line item in the store, oldest first.
    async fn list_all_items(&self) -> Result<Vec<LineItem>>;

    /// Updates the status of one line item.
    ///
    /// Fails with `ItemNotFound` if no row matches.
    async fn update_item_status(&self, id: LineItemId, status: ItemStatus) -> Result<()>;

    /// Updates the status of every line item belonging to an order.
    ///
    /// Idempotent: items already in the target status are unaffected.
    async fn update_item_statuses_for_order(
        &self,
        order_id: OrderId,
        status: ItemStatus,
    ) -> Result<()>;

    /// Deletes every line item belonging to an order.
    async fn delete_items_for_order(&self, order_id: OrderId) -> Result<()>;

    // -- Change feed --

    /// Subscribes to the change feed.
    ///
    /// Receivers that fall behind see `Lagged`; treat it as "something
    /// changed" and refetch.
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;

    /// Short name of the backing implementation, for diagnostics.
    fn backend(&self) -> &'static str;
}

/// Extension trait providing convenience methods for order stores.
#[async_trait]
pub trait OrderStoreExt: OrderStore {
    /// Checks if an order exists.
    async fn order_exists(&self, id: OrderId) -> Result<bool> {
        Ok(self.get_order(id).await?.is_some())
    }
}

// Blanket implementation for all OrderStore implementations
impl<T: OrderStore + ?Sized> OrderStoreExt for T {}
