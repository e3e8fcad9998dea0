use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{RwLock, broadcast};

use common::{ItemStatus, LineItemId, OrderId, OrderStatus, PreorderId};

use crate::{
    ChangeEvent, ChangeKind, Result, StoreError, TableKind,
    records::{LineItem, NewLineItem, NewOrder, NewPreorder, Order, Preorder},
    store::OrderStore,
};

const CHANGE_FEED_CAPACITY: usize = 256;

#[derive(Default)]
struct Tables {
    preorders: HashMap<PreorderId, Preorder>,
    orders: HashMap<OrderId, Order>,
    items: HashMap<LineItemId, LineItem>,
}

/// In-memory order store implementation.
///
/// Used by tests and as the default backing store when no database is
/// configured. Provides the same interface and change feed semantics as
/// the PostgreSQL implementation.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    tables: Arc<RwLock<Tables>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            changes,
        }
    }

    /// Returns the number of live orders stored.
    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Returns the number of line items stored.
    pub async fn item_count(&self) -> usize {
        self.tables.read().await.items.len()
    }

    /// Clears all tables.
    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        tables.preorders.clear();
        tables.orders.clear();
        tables.items.clear();
    }

    fn announce(&self, table: TableKind, kind: ChangeKind, row_id: uuid::Uuid) {
        // No receivers is fine; the send error only means nobody is listening.
        let _ = self.changes.send(ChangeEvent::new(table, kind, row_id));
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_preorder(&self, new: NewPreorder) -> Result<Preorder> {
        let preorder = Preorder {
            id: PreorderId::new(),
            name: new.name,
            email: new.email,
            pickup_time: new.pickup_time,
            drinks: new.drinks,
            total_price: new.total_price,
            is_collected: false,
            created_at: Utc::now(),
        };

        let mut tables = self.tables.write().await;
        tables.preorders.insert(preorder.id, preorder.clone());
        drop(tables);

        self.announce(
            TableKind::Preorders,
            ChangeKind::Insert,
            preorder.id.as_uuid(),
        );
        Ok(preorder)
    }

    async fn get_preorder(&self, id: PreorderId) -> Result<Option<Preorder>> {
        Ok(self.tables.read().await.preorders.get(&id).cloned())
    }

    async fn list_preorders(&self) -> Result<Vec<Preorder>> {
        let tables = self.tables.read().await;
        let mut preorders: Vec<_> = tables.preorders.values().cloned().collect();
        preorders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(preorders)
    }

    async fn set_preorder_collected(&self, id: PreorderId, collected: bool) -> Result<()> {
        let mut tables = self.tables.write().await;
        let preorder = tables
            .preorders
            .get_mut(&id)
            .ok_or(StoreError::PreorderNotFound(id))?;
        preorder.is_collected = collected;
        drop(tables);

        self.announce(TableKind::Preorders, ChangeKind::Update, id.as_uuid());
        Ok(())
    }

    async fn insert_order(&self, new: NewOrder) -> Result<Order> {
        let order = Order {
            id: OrderId::new(),
            customer_name: new.customer_name,
            total_amount: new.total_amount,
            status: new.status,
            source_preorder_id: new.source_preorder_id,
            created_at: Utc::now(),
        };

        let mut tables = self.tables.write().await;
        tables.orders.insert(order.id, order.clone());
        drop(tables);

        self.announce(TableKind::LiveOrders, ChangeKind::Insert, order.id.as_uuid());
        Ok(order)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.tables.read().await.orders.get(&id).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<_> = tables.orders.values().cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(orders)
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        let order = tables
            .orders
            .get_mut(&id)
            .ok_or(StoreError::OrderNotFound(id))?;
        order.status = status;
        drop(tables);

        self.announce(TableKind::LiveOrders, ChangeKind::Update, id.as_uuid());
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .orders
            .remove(&id)
            .ok_or(StoreError::OrderNotFound(id))?;
        drop(tables);

        self.announce(TableKind::LiveOrders, ChangeKind::Delete, id.as_uuid());
        Ok(())
    }

    async fn find_order_by_source_preorder(&self, id: PreorderId) -> Result<Option<Order>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .values()
            .find(|o| o.source_preorder_id == Some(id))
            .cloned())
    }

    async fn insert_line_items(&self, items: Vec<NewLineItem>) -> Result<Vec<LineItem>> {
        let mut tables = self.tables.write().await;

        // Enforce the foreign key up front so the whole batch is rejected
        // before anything lands, like the transactional insert does.
        for item in &items {
            if !tables.orders.contains_key(&item.order_id) {
                return Err(StoreError::OrderNotFound(item.order_id));
            }
        }

        let mut stored = Vec::with_capacity(items.len());
        for new in items {
            let item = LineItem {
                id: LineItemId::new(),
                order_id: new.order_id,
                drink_id: new.drink_id,
                drink_name: new.drink_name,
                quantity: new.quantity,
                customizations: new.customizations,
                unit_price: new.unit_price,
                status: new.status,
                created_at: Utc::now(),
            };
            tables.items.insert(item.id, item.clone());
            stored.push(item);
        }
        drop(tables);

        for item in &stored {
            self.announce(
                TableKind::LiveOrderItems,
                ChangeKind::Insert,
                item.id.as_uuid(),
            );
        }
        Ok(stored)
    }

    async fn get_line_item(&self, id: LineItemId) -> Result<Option<LineItem>> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn list_items_for_order(&self, order_id: OrderId) -> Result<Vec<LineItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<_> = tables
            .items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }

    async fn list_all_items(&self) -> Result<Vec<LineItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<_> = tables.items.values().cloned().collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }

    async fn update_item_status(&self, id: LineItemId, status: ItemStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        let item = tables
            .items
            .get_mut(&id)
            .ok_or(StoreError::ItemNotFound(id))?;
        item.status = status;
        drop(tables);

        self.announce(TableKind::LiveOrderItems, ChangeKind::Update, id.as_uuid());
        Ok(())
    }

    async fn update_item_statuses_for_order(
        &self,
        order_id: OrderId,
        status: ItemStatus,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let changed: Vec<_> = tables
            .items
            .values_mut()
            .filter(|i| i.order_id == order_id && i.status != status)
            .map(|i| {
                i.status = status;
                i.id
            })
            .collect();
        drop(tables);

        for id in changed {
            self.announce(TableKind::LiveOrderItems, ChangeKind::Update, id.as_uuid());
        }
        Ok(())
    }

    async fn delete_items_for_order(&self, order_id: OrderId) -> Result<()> {
        let mut tables = self.tables.write().await;
        let removed: Vec<_> = tables
            .items
            .values()
            .filter(|i| i.order_id == order_id)
            .map(|i| i.id)
            .collect();
        for id in &removed {
            tables.items.remove(id);
        }
        drop(tables);

        for id in removed {
            self.announce(TableKind::LiveOrderItems, ChangeKind::Delete, id.as_uuid());
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Customizations, Money};

    fn new_order() -> NewOrder {
        NewOrder {
            customer_name: Some("Sam".to_string()),
            total_amount: Money::from_pence(640),
            status: OrderStatus::Pending,
            source_preorder_id: None,
        }
    }

    fn new_item(order_id: OrderId, drink_id: &str) -> NewLineItem {
        NewLineItem {
            order_id,
            drink_id: drink_id.to_string(),
            drink_name: drink_id.to_string(),
            quantity: 1,
            customizations: Customizations::none(),
            unit_price: Money::from_pence(300),
            status: ItemStatus::Pending,
        }
    }

    #[tokio::test]
    async fn insert_and_get_order() {
        let store = InMemoryOrderStore::new();

        let order = store.insert_order(new_order()).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);

        let fetched = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn update_status_of_missing_order_fails() {
        let store = InMemoryOrderStore::new();
        let result = store
            .update_order_status(OrderId::new(), OrderStatus::Completed)
            .await;
        assert!(matches!(result, Err(StoreError::OrderNotFound(_))));
    }

    #[tokio::test]
    async fn insert_items_rejects_unknown_order() {
        let store = InMemoryOrderStore::new();
        let order = store.insert_order(new_order()).await.unwrap();

        let items = vec![
            new_item(order.id, "latte"),
            new_item(OrderId::new(), "espresso"),
        ];
        let result = store.insert_line_items(items).await;
        assert!(matches!(result, Err(StoreError::OrderNotFound(_))));

        // Nothing from the batch landed
        assert_eq!(store.item_count().await, 0);
    }

    #[tokio::test]
    async fn items_listed_in_insertion_order() {
        let store = InMemoryOrderStore::new();
        let order = store.insert_order(new_order()).await.unwrap();

        store
            .insert_line_items(vec![new_item(order.id, "latte")])
            .await
            .unwrap();
        store
            .insert_line_items(vec![new_item(order.id, "espresso")])
            .await
            .unwrap();

        let items = store.list_items_for_order(order.id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].drink_id, "latte");
        assert_eq!(items[1].drink_id, "espresso");
    }

    #[tokio::test]
    async fn bulk_status_update_is_idempotent() {
        let store = InMemoryOrderStore::new();
        let order = store.insert_order(new_order()).await.unwrap();
        store
            .insert_line_items(vec![new_item(order.id, "latte"), new_item(order.id, "mocha")])
            .await
            .unwrap();

        store
            .update_item_statuses_for_order(order.id, ItemStatus::Completed)
            .await
            .unwrap();
        store
            .update_item_statuses_for_order(order.id, ItemStatus::Completed)
            .await
            .unwrap();

        let items = store.list_items_for_order(order.id).await.unwrap();
        assert!(items.iter().all(|i| i.status == ItemStatus::Completed));
    }

    #[tokio::test]
    async fn delete_cascade_order_of_operations() {
        let store = InMemoryOrderStore::new();
        let order = store.insert_order(new_order()).await.unwrap();
        store
            .insert_line_items(vec![new_item(order.id, "latte")])
            .await
            .unwrap();

        store.delete_items_for_order(order.id).await.unwrap();
        store.delete_order(order.id).await.unwrap();

        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.item_count().await, 0);
    }

    #[tokio::test]
    async fn preorder_collect_flag() {
        let store = InMemoryOrderStore::new();
        let preorder = store
            .insert_preorder(NewPreorder {
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                pickup_time: "10:30".to_string(),
                drinks: vec![],
                total_price: Money::from_pence(380),
            })
            .await
            .unwrap();
        assert!(!preorder.is_collected);

        store
            .set_preorder_collected(preorder.id, true)
            .await
            .unwrap();
        let fetched = store.get_preorder(preorder.id).await.unwrap().unwrap();
        assert!(fetched.is_collected);
    }

    #[tokio::test]
    async fn find_order_by_source_preorder() {
        let store = InMemoryOrderStore::new();
        let preorder_id = PreorderId::new();

        let mut new = new_order();
        new.source_preorder_id = Some(preorder_id);
        let order = store.insert_order(new).await.unwrap();

        let found = store
            .find_order_by_source_preorder(preorder_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, order.id);

        let missing = store
            .find_order_by_source_preorder(PreorderId::new())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn change_feed_announces_writes() {
        let store = InMemoryOrderStore::new();
        let mut rx = store.subscribe();

        let order = store.insert_order(new_order()).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, TableKind::LiveOrders);
        assert_eq!(event.kind, ChangeKind::Insert);
        assert_eq!(event.row_id, order.id.as_uuid());
    }

    #[tokio::test]
    async fn change_feed_announces_item_batch() {
        let store = InMemoryOrderStore::new();
        let order = store.insert_order(new_order()).await.unwrap();
        let mut rx = store.subscribe();

        store
            .insert_line_items(vec![new_item(order.id, "latte"), new_item(order.id, "mocha")])
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.table, TableKind::LiveOrderItems);
        assert_eq!(second.table, TableKind::LiveOrderItems);
    }
}
