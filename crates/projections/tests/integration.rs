//! Integration tests: order operations through the change feed into
//! the kitchen, archive, and sales views.

use std::sync::Arc;

use common::{Customizations, OrderStatus};
use domain::{DraftItem, OrderService};
use order_store::InMemoryOrderStore;
use projections::ViewRefresher;

fn setup() -> (OrderService<InMemoryOrderStore>, ViewRefresher<InMemoryOrderStore>) {
    let store = InMemoryOrderStore::new();
    let service = OrderService::new(store.clone());
    let refresher = ViewRefresher::new(store);
    (service, refresher)
}

fn oat() -> Customizations {
    Customizations {
        oat_milk: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_order_lifecycle_across_views() {
    let (service, refresher) = setup();

    let (order, _) = service
        .create_order(
            Some("Sam".to_string()),
            vec![
                DraftItem::customized("latte", 2, oat()),
                DraftItem::plain("espresso", 1),
            ],
        )
        .await
        .unwrap();
    refresher.refresh().await.unwrap();

    let board = refresher.kitchen().await;
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].customer_name, "Sam");
    assert_eq!(board[0].items.len(), 2);
    assert!(board[0].items[0].customizations.oat_milk);

    // Nothing completed yet
    let report = refresher.sales().await;
    assert_eq!(report.completed_count, 0);
    assert!(report.revenue.is_zero());

    service
        .set_order_status(order.id, OrderStatus::Completed)
        .await
        .unwrap();
    refresher.refresh().await.unwrap();

    assert!(refresher.kitchen().await.is_empty());

    let archive = refresher.archive(Some(OrderStatus::Completed)).await;
    assert_eq!(archive.len(), 1);
    assert_eq!(archive[0].total_amount.pence(), 980);

    let report = refresher.sales().await;
    assert_eq!(report.completed_count, 1);
    assert_eq!(report.revenue.pence(), 980);
    assert_eq!(report.items_sold, 3);
    assert_eq!(report.by_drink[0].drink_id, "latte");
}

#[tokio::test]
async fn test_sales_count_items_rung_off_before_order_completes() {
    let (service, refresher) = setup();

    let (_, items) = service
        .create_order(
            None,
            vec![
                DraftItem::customized("latte", 1, oat()),
                DraftItem::plain("espresso", 1),
            ],
        )
        .await
        .unwrap();

    // Ring off the latte; the order stays open at the till
    service.toggle_item(items[0].id).await.unwrap();
    refresher.refresh().await.unwrap();

    let report = refresher.sales().await;
    assert_eq!(report.completed_count, 0);
    assert_eq!(report.items_sold, 1);
    assert_eq!(report.revenue.pence(), 340);
    assert_eq!(report.by_drink[0].drink_id, "latte");
}

#[tokio::test]
async fn test_collected_preorder_appears_on_kitchen_board() {
    let (service, refresher) = setup();

    let preorder = service
        .submit_preorder(
            "Alex".to_string(),
            "alex@example.com".to_string(),
            "10:30".to_string(),
            vec![DraftItem::plain("matcha_hot", 1)],
        )
        .await
        .unwrap();
    refresher.refresh().await.unwrap();
    assert!(refresher.kitchen().await.is_empty());

    service.collect_preorder(preorder.id).await.unwrap();
    refresher.refresh().await.unwrap();

    let board = refresher.kitchen().await;
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].customer_name, "Alex");
    assert_eq!(board[0].items[0].drink_name, "Matcha");
}

#[tokio::test]
async fn test_change_feed_drives_refresh() {
    let store = InMemoryOrderStore::new();
    let service = OrderService::new(store.clone());
    let refresher = Arc::new(ViewRefresher::new(store));

    let background = Arc::clone(&refresher);
    let handle = tokio::spawn(async move { background.run().await });

    service
        .create_order(None, vec![DraftItem::plain("latte", 1)])
        .await
        .unwrap();

    let mut board = refresher.kitchen().await;
    for _ in 0..50 {
        if !board.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        board = refresher.kitchen().await;
    }
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].customer_name, "Guest");

    handle.abort();
}

#[tokio::test]
async fn test_deleted_order_disappears_from_views() {
    let (service, refresher) = setup();

    let (order, _) = service
        .create_order(None, vec![DraftItem::plain("latte", 1)])
        .await
        .unwrap();
    refresher.refresh().await.unwrap();
    assert_eq!(refresher.archive(None).await.len(), 1);

    service.delete_order_cascade(order.id).await.unwrap();
    refresher.refresh().await.unwrap();

    assert!(refresher.archive(None).await.is_empty());
    assert!(refresher.kitchen().await.is_empty());
    assert_eq!(refresher.sales().await.order_count, 0);
}
