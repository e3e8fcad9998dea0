//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, OrderError};
use gateways::GatewayError;
use order_store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Missing or invalid admin credentials.
    Unauthorized,
    /// Domain logic error.
    Domain(DomainError),
    /// Outbound gateway failure.
    Gateway(GatewayError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unauthorized = self {
            return (
                StatusCode::UNAUTHORIZED,
                [(axum::http::header::WWW_AUTHENTICATE, "Basic realm=\"admin\"")],
                axum::Json(serde_json::json!({ "error": "unauthorized" })),
            )
                .into_response();
        }

        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => unreachable!(),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Gateway(err) => {
                tracing::error!(error = %err, "gateway failure");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Order(order_err) => match order_err {
            OrderError::NoItems
            | OrderError::NoDrinks
            | OrderError::InvalidQuantity { .. }
            | OrderError::UnknownDrink(_) => (StatusCode::BAD_REQUEST, err.to_string()),
            OrderError::OrderNotFound(_)
            | OrderError::ItemNotFound(_)
            | OrderError::PreorderNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            OrderError::AlreadyCollected(_) | OrderError::NotCollected(_) => {
                (StatusCode::CONFLICT, err.to_string())
            }
        },
        DomainError::Store(store_err) => match store_err {
            StoreError::OrderNotFound(_)
            | StoreError::ItemNotFound(_)
            | StoreError::PreorderNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        },
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Domain(DomainError::Store(err))
    }
}
