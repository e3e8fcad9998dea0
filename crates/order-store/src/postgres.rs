use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tokio::sync::broadcast;
use uuid::Uuid;

use common::{
    Customizations, ItemStatus, LineItemId, Money, OrderId, OrderStatus, PreorderId,
};

use crate::{
    ChangeEvent, ChangeKind, Result, StoreError, TableKind,
    records::{LineItem, NewLineItem, NewOrder, NewPreorder, Order, Preorder, PreorderDrink},
    store::OrderStore,
};

const CHANGE_FEED_CAPACITY: usize = 256;

/// PostgreSQL-backed order store implementation.
///
/// Change events are announced after each successful write from this
/// process. (Writes made by other processes against the same database
/// are not observed; each API instance owns its tables.)
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { pool, changes }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn announce(&self, table: TableKind, kind: ChangeKind, row_id: Uuid) {
        let _ = self.changes.send(ChangeEvent::new(table, kind, row_id));
    }

    fn bad_status(value: &str) -> StoreError {
        StoreError::Serialization(serde_json::Error::io(std::io::Error::other(format!(
            "unknown status value: {value}"
        ))))
    }

    fn row_to_preorder(row: PgRow) -> Result<Preorder> {
        let drinks_json: serde_json::Value = row.try_get("drinks")?;
        let drinks: Vec<PreorderDrink> = serde_json::from_value(drinks_json)?;

        Ok(Preorder {
            id: PreorderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            pickup_time: row.try_get("pickup_time")?,
            drinks,
            total_price: Money::from_pence(row.try_get("total_price")?),
            is_collected: row.try_get("is_collected")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let status_str: String = row.try_get("status")?;
        let status = OrderStatus::parse(&status_str).ok_or_else(|| Self::bad_status(&status_str))?;

        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_name: row.try_get("customer_name")?,
            total_amount: Money::from_pence(row.try_get("total_amount")?),
            status,
            source_preorder_id: row
                .try_get::<Option<Uuid>, _>("source_preorder_id")?
                .map(PreorderId::from_uuid),
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_item(row: PgRow) -> Result<LineItem> {
        let status_str: String = row.try_get("status")?;
        let status = ItemStatus::parse(&status_str).ok_or_else(|| Self::bad_status(&status_str))?;

        let customizations_json: serde_json::Value = row.try_get("customizations")?;
        let customizations: Customizations = serde_json::from_value(customizations_json)?;

        Ok(LineItem {
            id: LineItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            order_id: OrderId::from_uuid(row.try_get::<Uuid, _>("live_order_id")?),
            drink_id: row.try_get("drink_id")?,
            drink_name: row.try_get("drink_name")?,
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            customizations,
            unit_price: Money::from_pence(row.try_get("calculated_unit_price")?),
            status,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert_preorder(&self, new: NewPreorder) -> Result<Preorder> {
        let id = PreorderId::new();
        let drinks_json = serde_json::to_value(&new.drinks)?;

        let row = sqlx::query(
            r#"
            INSERT INTO preorders (id, name, email, pickup_time, drinks, total_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, pickup_time, drinks, total_price, is_collected, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.pickup_time)
        .bind(drinks_json)
        .bind(new.total_price.pence())
        .fetch_one(&self.pool)
        .await?;

        let preorder = Self::row_to_preorder(row)?;
        self.announce(TableKind::Preorders, ChangeKind::Insert, id.as_uuid());
        Ok(preorder)
    }

    async fn get_preorder(&self, id: PreorderId) -> Result<Option<Preorder>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, pickup_time, drinks, total_price, is_collected, created_at
            FROM preorders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_preorder).transpose()
    }

    async fn list_preorders(&self) -> Result<Vec<Preorder>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, pickup_time, drinks, total_price, is_collected, created_at
            FROM preorders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_preorder).collect()
    }

    async fn set_preorder_collected(&self, id: PreorderId, collected: bool) -> Result<()> {
        let result = sqlx::query("UPDATE preorders SET is_collected = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(collected)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::PreorderNotFound(id));
        }

        self.announce(TableKind::Preorders, ChangeKind::Update, id.as_uuid());
        Ok(())
    }

    async fn insert_order(&self, new: NewOrder) -> Result<Order> {
        let id = OrderId::new();

        let row = sqlx::query(
            r#"
            INSERT INTO live_orders (id, customer_name, total_amount, status, source_preorder_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_name, total_amount, status, source_preorder_id, created_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&new.customer_name)
        .bind(new.total_amount.pence())
        .bind(new.status.as_str())
        .bind(new.source_preorder_id.map(|p| p.as_uuid()))
        .fetch_one(&self.pool)
        .await?;

        let order = Self::row_to_order(row)?;
        self.announce(TableKind::LiveOrders, ChangeKind::Insert, id.as_uuid());
        Ok(order)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_name, total_amount, status, source_preorder_id, created_at
            FROM live_orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_name, total_amount, status, source_preorder_id, created_at
            FROM live_orders
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<()> {
        let result = sqlx::query("UPDATE live_orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(id));
        }

        self.announce(TableKind::LiveOrders, ChangeKind::Update, id.as_uuid());
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        let result = sqlx::query("DELETE FROM live_orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(id));
        }

        self.announce(TableKind::LiveOrders, ChangeKind::Delete, id.as_uuid());
        Ok(())
    }

    async fn find_order_by_source_preorder(&self, id: PreorderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_name, total_amount, status, source_preorder_id, created_at
            FROM live_orders
            WHERE source_preorder_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn insert_line_items(&self, items: Vec<NewLineItem>) -> Result<Vec<LineItem>> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(items.len());

        for new in &items {
            let id = LineItemId::new();
            let customizations_json = serde_json::to_value(new.customizations)?;

            let row = sqlx::query(
                r#"
                INSERT INTO live_order_items
                    (id, live_order_id, drink_id, drink_name, quantity, customizations,
                     calculated_unit_price, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, live_order_id, drink_id, drink_name, quantity, customizations,
                          calculated_unit_price, status, created_at
                "#,
            )
            .bind(id.as_uuid())
            .bind(new.order_id.as_uuid())
            .bind(&new.drink_id)
            .bind(&new.drink_name)
            .bind(new.quantity as i32)
            .bind(customizations_json)
            .bind(new.unit_price.pence())
            .bind(new.status.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                // A missing parent surfaces as a foreign key violation
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some("live_order_items_live_order_id_fkey")
                {
                    return StoreError::OrderNotFound(new.order_id);
                }
                StoreError::Database(e)
            })?;

            stored.push(Self::row_to_item(row)?);
        }

        tx.commit().await?;

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
        let row = sqlx::query(
            r#"
            SELECT id, live_order_id, drink_id, drink_name, quantity, customizations,
                   calculated_unit_price, status, created_at
            FROM live_order_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_item).transpose()
    }

    async fn list_items_for_order(&self, order_id: OrderId) -> Result<Vec<LineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, live_order_id, drink_id, drink_name, quantity, customizations,
                   calculated_unit_price, status, created_at
            FROM live_order_items
            WHERE live_order_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn list_all_items(&self) -> Result<Vec<LineItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, live_order_id, drink_id, drink_name, quantity, customizations,
                   calculated_unit_price, status, created_at
            FROM live_order_items
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn update_item_status(&self, id: LineItemId, status: ItemStatus) -> Result<()> {
        let result = sqlx::query("UPDATE live_order_items SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::ItemNotFound(id));
        }

        self.announce(TableKind::LiveOrderItems, ChangeKind::Update, id.as_uuid());
        Ok(())
    }

    async fn update_item_statuses_for_order(
        &self,
        order_id: OrderId,
        status: ItemStatus,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE live_order_items SET status = $2 WHERE live_order_id = $1 AND status <> $2",
        )
        .bind(order_id.as_uuid())
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        self.announce(
            TableKind::LiveOrderItems,
            ChangeKind::Update,
            order_id.as_uuid(),
        );
        Ok(())
    }

    async fn delete_items_for_order(&self, order_id: OrderId) -> Result<()> {
        sqlx::query("DELETE FROM live_order_items WHERE live_order_id = $1")
            .bind(order_id.as_uuid())
            .execute(&self.pool)
            .await?;

        self.announce(
            TableKind::LiveOrderItems,
            ChangeKind::Delete,
            order_id.as_uuid(),
        );
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
