//! Pre-order endpoints.
//!
//! Submission is public; everything else is admin.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use chrono::{DateTime, Utc};
use common::{Money, PreorderId};
use domain::DraftItem;
use order_store::{OrderStore, Preorder, PreorderDrink};
use serde::{Deserialize, Serialize};

use crate::auth::require_admin;
use crate::error::ApiError;
use crate::routes::orders::{AppState, OrderResponse};

// -- Request types --

#[derive(Deserialize)]
pub struct SubmitPreorderRequest {
    pub name: String,
    pub email: String,
    pub pickup_time: String,
    pub drinks: Vec<DraftItem>,
}

// -- Response types --

#[derive(Serialize)]
pub struct PreorderDrinkResponse {
    pub drink_id: String,
    pub drink_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

#[derive(Serialize)]
pub struct PreorderResponse {
    pub id: PreorderId,
    pub name: String,
    pub email: String,
    pub pickup_time: String,
    pub drinks: Vec<PreorderDrinkResponse>,
    pub total_price: Money,
    pub is_collected: bool,
    pub created_at: DateTime<Utc>,
}

impl PreorderResponse {
    fn from_preorder(preorder: Preorder) -> Self {
        Self {
            id: preorder.id,
            name: preorder.name,
            email: preorder.email,
            pickup_time: preorder.pickup_time,
            drinks: preorder
                .drinks
                .into_iter()
                .map(|d: PreorderDrink| PreorderDrinkResponse {
                    drink_id: d.drink_id,
                    drink_name: d.drink_name,
                    quantity: d.quantity,
                    unit_price: d.unit_price,
                })
                .collect(),
            total_price: preorder.total_price,
            is_collected: preorder.is_collected,
            created_at: preorder.created_at,
        }
    }
}

// -- Handlers --

/// POST /preorders — public pre-order submission.
#[tracing::instrument(skip(state, req))]
pub async fn submit<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SubmitPreorderRequest>,
) -> Result<(StatusCode, Json<PreorderResponse>), ApiError> {
    let preorder = state
        .order_service
        .submit_preorder(req.name, req.email, req.pickup_time, req.drinks)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PreorderResponse::from_preorder(preorder)),
    ))
}

/// GET /preorders — list all pre-orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PreorderResponse>>, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let preorders = state.order_service.store().list_preorders().await?;
    Ok(Json(
        preorders
            .into_iter()
            .map(PreorderResponse::from_preorder)
            .collect(),
    ))
}

/// POST /preorders/{id}/collect — mark collected and derive a live order.
#[tracing::instrument(skip(state, headers))]
pub async fn collect<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let (order, items) = state
        .order_service
        .collect_preorder(PreorderId::from_uuid(id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse::from_order(order, items)),
    ))
}

/// POST /preorders/{id}/uncollect — revert a collection.
#[tracing::instrument(skip(state, headers))]
pub async fn uncollect<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    state
        .order_service
        .uncollect_preorder(PreorderId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /preorders/{id}/confirmation — send the confirmation email.
#[tracing::instrument(skip(state, headers))]
pub async fn send_confirmation<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let preorder_id = PreorderId::from_uuid(id);
    let preorder = state
        .order_service
        .store()
        .get_preorder(preorder_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Pre-order {preorder_id} not found")))?;

    state.email.send_confirmation(&preorder).await?;

    Ok(StatusCode::ACCEPTED)
}
