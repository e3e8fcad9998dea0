//! Read-side view endpoints (admin surface).

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use common::OrderStatus;
use order_store::OrderStore;
use projections::{ArchiveEntry, KitchenTicket, SalesReport};
use serde::Deserialize;

use crate::auth::require_admin;
use crate::error::ApiError;
use crate::routes::orders::AppState;

#[derive(Debug, Deserialize)]
pub struct ArchiveQuery {
    pub status: Option<String>,
}

/// GET /views/kitchen — pending orders for the barista board.
#[tracing::instrument(skip(state, headers))]
pub async fn kitchen<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<KitchenTicket>>, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    // Serve from a fresh snapshot so a just-created order is visible
    state
        .views
        .refresh()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(state.views.kitchen().await))
}

/// GET /views/archive?status= — all orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn archive<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<ArchiveQuery>,
) -> Result<Json<Vec<ArchiveEntry>>, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => Some(
            OrderStatus::parse(raw)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid status: {raw}")))?,
        ),
    };

    state
        .views
        .refresh()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(state.views.archive(status).await))
}

/// GET /views/sales — aggregate sales figures.
#[tracing::instrument(skip(state, headers))]
pub async fn sales<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<SalesReport>, ApiError> {
    require_admin(&headers, state.auth.as_ref())?;

    state
        .views
        .refresh()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(state.views.sales().await))
}
