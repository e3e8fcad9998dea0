//! Public contact form endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use gateways::ContactMessage;
use order_store::OrderStore;

use crate::error::ApiError;
use crate::routes::orders::AppState;

/// POST /contact — relay an enquiry to the configured form service.
#[tracing::instrument(skip(state, message))]
pub async fn submit<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(message): Json<ContactMessage>,
) -> Result<StatusCode, ApiError> {
    if message.name.trim().is_empty() || message.message.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "name and message are required".to_string(),
        ));
    }

    state.contact.relay(&message).await?;

    Ok(StatusCode::ACCEPTED)
}
