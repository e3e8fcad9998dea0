//! Change-driven view refresher.
//!
//! The store's change feed says that something changed, not what it
//! now looks like, so every notification triggers a full refetch of
//! the order tables into an in-memory snapshot. Views are computed
//! from the snapshot at query time. A lagged receiver loses nothing:
//! the next refetch reloads everything anyway.

use std::sync::Arc;

use common::OrderStatus;
use order_store::{LineItem, Order, OrderStore};
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;

use crate::Result;
use crate::views::{archive, kitchen, sales};
use crate::{ArchiveEntry, KitchenTicket, SalesReport};

/// Snapshot of the live order tables.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub items: Vec<LineItem>,
}

/// Keeps a snapshot of the order tables fresh and serves views from it.
pub struct ViewRefresher<S: OrderStore> {
    store: S,
    snapshot: Arc<RwLock<Snapshot>>,
}

impl<S: OrderStore> ViewRefresher<S> {
    /// Creates a refresher with an empty snapshot. Call [`refresh`]
    /// (or start [`run`]) to load it.
    ///
    /// [`refresh`]: ViewRefresher::refresh
    /// [`run`]: ViewRefresher::run
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
        }
    }

    /// Refetches all orders and items into the snapshot.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let orders = self.store.list_orders().await?;
        let items = self.store.list_all_items().await?;

        let mut snapshot = self.snapshot.write().await;
        snapshot.orders = orders;
        snapshot.items = items;
        drop(snapshot);

        metrics::counter!("views_refreshed").increment(1);
        Ok(())
    }

    /// Consumes the store's change feed until the sender is dropped,
    /// refreshing the snapshot on every notification.
    pub async fn run(&self) {
        let mut changes = self.store.subscribe();
        loop {
            match changes.recv().await {
                Ok(change) => {
                    tracing::debug!(table = %change.table, kind = ?change.kind, "change received");
                    if let Err(e) = self.refresh().await {
                        tracing::warn!(error = %e, "view refresh failed, keeping stale snapshot");
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "change feed lagged, refetching");
                    if let Err(e) = self.refresh().await {
                        tracing::warn!(error = %e, "view refresh failed, keeping stale snapshot");
                    }
                }
                Err(RecvError::Closed) => {
                    tracing::info!("change feed closed, stopping refresher");
                    break;
                }
            }
        }
    }

    /// Returns the kitchen board: pending orders, oldest first.
    pub async fn kitchen(&self) -> Vec<KitchenTicket> {
        let snapshot = self.snapshot.read().await;
        kitchen::compute(&snapshot.orders, &snapshot.items)
    }

    /// Returns the archive, newest first, optionally filtered by status.
    pub async fn archive(&self, status: Option<OrderStatus>) -> Vec<ArchiveEntry> {
        let snapshot = self.snapshot.read().await;
        archive::compute(&snapshot.orders, &snapshot.items, status)
    }

    /// Returns the sales report.
    pub async fn sales(&self) -> SalesReport {
        let snapshot = self.snapshot.read().await;
        sales::compute(&snapshot.orders, &snapshot.items)
    }
}
