//! Live order endpoints (admin surface).

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, Utc};
use common::{Customizations, ItemStatus, LineItemId, Money, OrderId, OrderStatus, PreorderId};
use domain::{DraftItem, OrderService};
use gateways::{AuthProvider, ContactGateway, EmailGateway};
use order_store::{LineItem, Order, OrderStore};
use projections::ViewRefresher;
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S>,
    pub views: Arc<ViewRefresher<S>>,
    pub email: Arc<dyn EmailGateway>,
    pub contact: Arc<dyn ContactGateway>,
    pub auth: Arc<dyn AuthProvider>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: Option<String>,
    pub items: Vec<DraftItem>,
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

// -- Response types --

#[derive(Serialize)]
pub struct ItemResponse {
    pub id: LineItemId,
    pub drink_id: String,
    pub drink_name: String,
    pub quantity: u32,
    pub customizations: Customizations,
    pub unit_price: Money,
    pub status: ItemStatus,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub total_amount: Money,
    pub source_preorder_id: Option<PreorderId>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

impl ItemResponse {
    fn from_item(item: LineItem) -> Self {
        Self {
            id: item.id,
            drink_id: item.drink_id,
            drink_name: item.drink_name,
            quantity: item.quantity,
            customizations: item.customizations,
            unit_price: item.unit_price,
            status: item.status,
        }
    }
}

impl OrderResponse {
    pub(crate) fn from_order(order: Order, items: Vec<LineItem>) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name,
            status: order.status,
            total_amount: order.total_amount,
            source_preorder_id: order.source_preorder_id,
            created_at: order.created_at,
            items: items.into_iter().map(ItemResponse::from_item).collect(),
        }
    }
}

// -- Handlers --

/// POST /orders — create a live order from the till.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let (order, items) = state
        .order_service
        .create_order(req.customer_name, req.items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::from_order(order, items)),
    ))
}

/// GET /orders/{id} — load one order with its items.
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<OrderResponse>, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let order_id = OrderId::from_uuid(id);
    let (order, items) = state
        .order_service
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {order_id} not found")))?;

    Ok(Json(OrderResponse::from_order(order, items)))
}

/// POST /orders/{id}/status — complete or revert an order.
#[tracing::instrument(skip(state, headers, req))]
pub async fn set_status<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let order_id = OrderId::from_uuid(id);
    let order = state
        .order_service
        .set_order_status(order_id, req.status)
        .await?;
    let items = state.order_service.store().list_items_for_order(order_id).await?;

    Ok(Json(OrderResponse::from_order(order, items)))
}

/// DELETE /orders/{id} — delete an order and its items.
#[tracing::instrument(skip(state, headers))]
pub async fn delete<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    state
        .order_service
        .delete_order_cascade(OrderId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /orders/items/{id}/toggle — flip one line item's status.
#[tracing::instrument(skip(state, headers))]
pub async fn toggle_item<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<ItemResponse>, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let item = state
        .order_service
        .toggle_item(LineItemId::from_uuid(id))
        .await?;

    Ok(Json(ItemResponse::from_item(item)))
}
