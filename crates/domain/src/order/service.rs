//! Order service providing the write-side operations.
//!
//! The store only does single-row writes, so multi-step operations are
//! sequenced here with compensating writes on failure: a parent order
//! whose items fail to land is deleted again, and a pre-order whose
//! derived order fails to materialize is un-collected.

use common::{Customizations, ItemStatus, Money, OrderStatus};
use order_store::{
    LineItem, NewLineItem, NewOrder, NewPreorder, Order, OrderStore, OrderStoreExt, Preorder,
    PreorderDrink,
};

use crate::catalog::find_drink;
use crate::customization::{display_name, normalize};
use crate::error::DomainError;
use crate::pricing::{Channel, unit_price};

use common::{LineItemId, OrderId, PreorderId};

use super::{DraftItem, OrderError};

/// A draft line after validation, normalization, and pricing.
struct PricedLine {
    drink_id: String,
    drink_name: String,
    quantity: u32,
    customizations: Customizations,
    unit_price: Money,
}

/// Service for managing live orders and pre-orders.
pub struct OrderService<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and prices draft items for a channel.
    fn price_drafts(
        drafts: &[DraftItem],
        channel: Channel,
    ) -> Result<Vec<PricedLine>, OrderError> {
        let mut lines = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let drink = find_drink(&draft.drink_id)
                .ok_or_else(|| OrderError::UnknownDrink(draft.drink_id.clone()))?;
            if draft.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    drink_id: draft.drink_id.clone(),
                    quantity: draft.quantity,
                });
            }

            let customizations = normalize(drink, &draft.customizations);
            lines.push(PricedLine {
                drink_id: drink.id.to_string(),
                drink_name: display_name(drink, &customizations),
                quantity: draft.quantity,
                customizations,
                unit_price: unit_price(drink, channel, &customizations),
            });
        }
        Ok(lines)
    }

    /// Creates a live order with its line items.
    ///
    /// The parent row is inserted first, then the items. If the items
    /// fail, the parent is deleted so no empty order is ever reachable.
    #[tracing::instrument(skip(self, items))]
    pub async fn create_order(
        &self,
        customer_name: Option<String>,
        items: Vec<DraftItem>,
    ) -> Result<(Order, Vec<LineItem>), DomainError> {
        if items.is_empty() {
            return Err(OrderError::NoItems.into());
        }
        let lines = Self::price_drafts(&items, Channel::Cashier)?;

        let total_amount: Money = lines
            .iter()
            .map(|l| l.unit_price.multiply(l.quantity))
            .sum();

        let order = self
            .store
            .insert_order(NewOrder {
                customer_name,
                total_amount,
                status: OrderStatus::Pending,
                source_preorder_id: None,
            })
            .await?;

        let new_items: Vec<NewLineItem> = lines
            .into_iter()
            .map(|l| NewLineItem {
                order_id: order.id,
                drink_id: l.drink_id,
                drink_name: l.drink_name,
                quantity: l.quantity,
                customizations: l.customizations,
                unit_price: l.unit_price,
                status: ItemStatus::Pending,
            })
            .collect();

        let stored_items = match self.store.insert_line_items(new_items).await {
            Ok(items) => items,
            Err(e) => {
                // Compensate: the parent must not outlive its missing items.
                if let Err(cleanup) = self.store.delete_order(order.id).await {
                    tracing::error!(
                        order_id = %order.id,
                        error = %e,
                        cleanup_error = %cleanup,
                        "failed to delete parent order after item insert failure; orphan left behind"
                    );
                }
                return Err(e.into());
            }
        };

        metrics::counter!("orders_created").increment(1);
        Ok((order, stored_items))
    }

    /// Loads an order with its line items. Returns None if it doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<(Order, Vec<LineItem>)>, DomainError> {
        let Some(order) = self.store.get_order(order_id).await? else {
            return Ok(None);
        };
        let items = self.store.list_items_for_order(order_id).await?;
        Ok(Some((order, items)))
    }

    /// Sets an order's status, items first.
    ///
    /// Completing marks every pending item completed before the parent;
    /// reverting marks every item pending before the parent. Both
    /// directions are idempotent at the item level.
    #[tracing::instrument(skip(self))]
    pub async fn set_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, DomainError> {
        if !self.store.order_exists(order_id).await? {
            return Err(OrderError::OrderNotFound(order_id).into());
        }

        let item_status = match status {
            OrderStatus::Completed => ItemStatus::Completed,
            OrderStatus::Pending => ItemStatus::Pending,
        };

        self.store
            .update_item_statuses_for_order(order_id, item_status)
            .await?;
        self.store.update_order_status(order_id, status).await?;

        if status == OrderStatus::Completed {
            metrics::counter!("orders_completed").increment(1);
        }

        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;
        Ok(order)
    }

    /// Toggles a single line item between pending and completed.
    ///
    /// The parent order's status is untouched.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_item(&self, item_id: LineItemId) -> Result<LineItem, DomainError> {
        let item = self
            .store
            .get_line_item(item_id)
            .await?
            .ok_or(OrderError::ItemNotFound(item_id))?;

        let toggled = item.status.toggled();
        self.store.update_item_status(item_id, toggled).await?;

        Ok(LineItem {
            status: toggled,
            ..item
        })
    }

    /// Deletes an order and all of its line items, items first.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order_cascade(&self, order_id: OrderId) -> Result<(), DomainError> {
        if !self.store.order_exists(order_id).await? {
            return Err(OrderError::OrderNotFound(order_id).into());
        }

        self.store.delete_items_for_order(order_id).await?;
        self.store.delete_order(order_id).await?;
        Ok(())
    }

    /// Submits a pre-order.
    ///
    /// Drinks are priced on the pre-order channel (specialty discount
    /// applies) and frozen: the stored name, unit price, and total never
    /// change afterwards.
    #[tracing::instrument(skip(self, drinks))]
    pub async fn submit_preorder(
        &self,
        name: String,
        email: String,
        pickup_time: String,
        drinks: Vec<DraftItem>,
    ) -> Result<Preorder, DomainError> {
        if drinks.is_empty() {
            return Err(OrderError::NoDrinks.into());
        }
        let lines = Self::price_drafts(&drinks, Channel::Preorder)?;

        let total_price: Money = lines
            .iter()
            .map(|l| l.unit_price.multiply(l.quantity))
            .sum();

        let drinks: Vec<PreorderDrink> = lines
            .into_iter()
            .map(|l| PreorderDrink {
                drink_id: l.drink_id,
                drink_name: l.drink_name,
                quantity: l.quantity,
                unit_price: l.unit_price,
            })
            .collect();

        let preorder = self
            .store
            .insert_preorder(NewPreorder {
                name,
                email,
                pickup_time,
                drinks,
                total_price,
            })
            .await?;

        metrics::counter!("preorders_submitted").increment(1);
        Ok(preorder)
    }

    /// Marks a pre-order collected and derives a live order from it.
    ///
    /// The derived order carries the pre-order's frozen prices and
    /// total, and points back at the pre-order. If the derived order
    /// cannot be created, the collected flag is rolled back.
    #[tracing::instrument(skip(self))]
    pub async fn collect_preorder(
        &self,
        preorder_id: PreorderId,
    ) -> Result<(Order, Vec<LineItem>), DomainError> {
        let preorder = self
            .store
            .get_preorder(preorder_id)
            .await?
            .ok_or(OrderError::PreorderNotFound(preorder_id))?;
        if preorder.is_collected {
            return Err(OrderError::AlreadyCollected(preorder_id).into());
        }
        if preorder.drinks.is_empty() {
            return Err(OrderError::NoDrinks.into());
        }

        self.store
            .set_preorder_collected(preorder_id, true)
            .await?;

        let result = self.derive_live_order(&preorder).await;
        match result {
            Ok(created) => Ok(created),
            Err(e) => {
                if let Err(cleanup) = self.store.set_preorder_collected(preorder_id, false).await {
                    tracing::error!(
                        preorder_id = %preorder_id,
                        error = %e,
                        cleanup_error = %cleanup,
                        "failed to un-collect pre-order after derive failure"
                    );
                }
                Err(e)
            }
        }
    }

    async fn derive_live_order(
        &self,
        preorder: &Preorder,
    ) -> Result<(Order, Vec<LineItem>), DomainError> {
        let order = self
            .store
            .insert_order(NewOrder {
                customer_name: Some(preorder.name.clone()),
                total_amount: preorder.total_price,
                status: OrderStatus::Pending,
                source_preorder_id: Some(preorder.id),
            })
            .await?;

        let new_items: Vec<NewLineItem> = preorder
            .drinks
            .iter()
            .map(|d| NewLineItem {
                order_id: order.id,
                drink_id: d.drink_id.clone(),
                // The snapshot name already carries the customizations
                drink_name: d.drink_name.clone(),
                quantity: d.quantity,
                customizations: Customizations::none(),
                unit_price: d.unit_price,
                status: ItemStatus::Pending,
            })
            .collect();

        match self.store.insert_line_items(new_items).await {
            Ok(items) => Ok((order, items)),
            Err(e) => {
                if let Err(cleanup) = self.store.delete_order(order.id).await {
                    tracing::error!(
                        order_id = %order.id,
                        error = %e,
                        cleanup_error = %cleanup,
                        "failed to delete derived order after item insert failure; orphan left behind"
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Reverts a collection: deletes the derived live order and clears
    /// the collected flag.
    #[tracing::instrument(skip(self))]
    pub async fn uncollect_preorder(&self, preorder_id: PreorderId) -> Result<(), DomainError> {
        let preorder = self
            .store
            .get_preorder(preorder_id)
            .await?
            .ok_or(OrderError::PreorderNotFound(preorder_id))?;
        if !preorder.is_collected {
            return Err(OrderError::NotCollected(preorder_id).into());
        }

        if let Some(order) = self.store.find_order_by_source_preorder(preorder_id).await? {
            self.store.delete_items_for_order(order.id).await?;
            self.store.delete_order(order.id).await?;
        }

        self.store
            .set_preorder_collected(preorder_id, false)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_store::InMemoryOrderStore;

    fn oat() -> Customizations {
        Customizations {
            oat_milk: true,
            ..Default::default()
        }
    }

    fn decaf() -> Customizations {
        Customizations {
            decaf: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_order_prices_and_totals() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store);

        let (order, items) = service
            .create_order(
                Some("Sam".to_string()),
                vec![
                    DraftItem::customized("latte", 2, oat()),
                    DraftItem::customized("espresso", 1, decaf()),
                ],
            )
            .await
            .unwrap();

        // 2 x £3.40 + 1 x £3.00
        assert_eq!(order.total_amount.pence(), 980);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_price.pence(), 340);
        assert_eq!(items[0].drink_name, "Oat Latte");
        assert_eq!(items[1].unit_price.pence(), 300);
        assert_eq!(items[1].drink_name, "Decaf Espresso");
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let result = service.create_order(None, vec![]).await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::NoItems))
        ));
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_order_rejects_unknown_drink_before_writing() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let result = service
            .create_order(
                None,
                vec![
                    DraftItem::plain("latte", 1),
                    DraftItem::plain("mocha", 1),
                ],
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::UnknownDrink(_)))
        ));
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.item_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_order_rejects_zero_quantity() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store);

        let result = service
            .create_order(None, vec![DraftItem::plain("latte", 0)])
            .await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidQuantity { .. }))
        ));
    }

    #[tokio::test]
    async fn test_complete_order_completes_items_first() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let (order, _) = service
            .create_order(
                None,
                vec![DraftItem::plain("latte", 1), DraftItem::plain("espresso", 1)],
            )
            .await
            .unwrap();

        let updated = service
            .set_order_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Completed);

        let items = store.list_items_for_order(order.id).await.unwrap();
        assert!(items.iter().all(|i| i.status == ItemStatus::Completed));
    }

    #[tokio::test]
    async fn test_revert_order_reverts_items() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let (order, _) = service
            .create_order(None, vec![DraftItem::plain("latte", 1)])
            .await
            .unwrap();
        service
            .set_order_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();

        let reverted = service
            .set_order_status(order.id, OrderStatus::Pending)
            .await
            .unwrap();
        assert_eq!(reverted.status, OrderStatus::Pending);

        let items = store.list_items_for_order(order.id).await.unwrap();
        assert!(items.iter().all(|i| i.status == ItemStatus::Pending));
    }

    #[tokio::test]
    async fn test_toggle_item_leaves_parent_alone() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let (order, items) = service
            .create_order(None, vec![DraftItem::plain("latte", 1)])
            .await
            .unwrap();

        let toggled = service.toggle_item(items[0].id).await.unwrap();
        assert_eq!(toggled.status, ItemStatus::Completed);

        let back = service.toggle_item(items[0].id).await.unwrap();
        assert_eq!(back.status, ItemStatus::Pending);

        let parent = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(parent.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_order_cascade() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let (order, _) = service
            .create_order(None, vec![DraftItem::plain("latte", 2)])
            .await
            .unwrap();

        service.delete_order_cascade(order.id).await.unwrap();
        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.item_count().await, 0);
    }

    #[tokio::test]
    async fn test_submit_preorder_applies_specialty_discount() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store);

        let preorder = service
            .submit_preorder(
                "Alex".to_string(),
                "alex@example.com".to_string(),
                "10:30".to_string(),
                vec![DraftItem::plain("matcha_hot", 1)],
            )
            .await
            .unwrap();

        assert_eq!(preorder.total_price.pence(), 380);
        assert_eq!(preorder.drinks[0].unit_price.pence(), 380);
        assert!(!preorder.is_collected);
    }

    #[tokio::test]
    async fn test_submit_preorder_no_discount_on_coffee() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store);

        let preorder = service
            .submit_preorder(
                "Alex".to_string(),
                "alex@example.com".to_string(),
                "10:30".to_string(),
                vec![DraftItem::customized("latte", 2, oat())],
            )
            .await
            .unwrap();

        assert_eq!(preorder.total_price.pence(), 680);
        assert_eq!(preorder.drinks[0].drink_name, "Oat Latte");
    }

    #[tokio::test]
    async fn test_collect_preorder_derives_live_order() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let preorder = service
            .submit_preorder(
                "Alex".to_string(),
                "alex@example.com".to_string(),
                "10:30".to_string(),
                vec![DraftItem::plain("matcha_hot", 2)],
            )
            .await
            .unwrap();

        let (order, items) = service.collect_preorder(preorder.id).await.unwrap();

        assert_eq!(order.customer_name.as_deref(), Some("Alex"));
        assert_eq!(order.source_preorder_id, Some(preorder.id));
        // The discounted snapshot price carries over
        assert_eq!(order.total_amount.pence(), 760);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price.pence(), 380);

        let stored = store.get_preorder(preorder.id).await.unwrap().unwrap();
        assert!(stored.is_collected);
    }

    #[tokio::test]
    async fn test_collect_twice_fails() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store);

        let preorder = service
            .submit_preorder(
                "Alex".to_string(),
                "alex@example.com".to_string(),
                "10:30".to_string(),
                vec![DraftItem::plain("latte", 1)],
            )
            .await
            .unwrap();

        service.collect_preorder(preorder.id).await.unwrap();
        let result = service.collect_preorder(preorder.id).await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::AlreadyCollected(_)))
        ));
    }

    #[tokio::test]
    async fn test_uncollect_removes_derived_order() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let preorder = service
            .submit_preorder(
                "Alex".to_string(),
                "alex@example.com".to_string(),
                "10:30".to_string(),
                vec![DraftItem::plain("latte", 1)],
            )
            .await
            .unwrap();
        service.collect_preorder(preorder.id).await.unwrap();

        service.uncollect_preorder(preorder.id).await.unwrap();

        assert_eq!(store.order_count().await, 0);
        assert_eq!(store.item_count().await, 0);
        let stored = store.get_preorder(preorder.id).await.unwrap().unwrap();
        assert!(!stored.is_collected);
    }

    #[tokio::test]
    async fn test_uncollect_uncollected_fails() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store);

        let preorder = service
            .submit_preorder(
                "Alex".to_string(),
                "alex@example.com".to_string(),
                "10:30".to_string(),
                vec![DraftItem::plain("latte", 1)],
            )
            .await
            .unwrap();

        let result = service.uncollect_preorder(preorder.id).await;
        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::NotCollected(_)))
        ));
    }

    #[tokio::test]
    async fn test_total_is_frozen_across_toggles() {
        let store = InMemoryOrderStore::new();
        let service = OrderService::new(store.clone());

        let (order, items) = service
            .create_order(None, vec![DraftItem::customized("latte", 2, oat())])
            .await
            .unwrap();
        let original_total = order.total_amount;

        service.toggle_item(items[0].id).await.unwrap();
        service
            .set_order_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();

        let stored = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, original_total);
    }
}
