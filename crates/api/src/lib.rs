//! HTTP API server for the café order system.
//!
//! Public surface: pre-order submission, contact form, health, metrics.
//! Admin surface (HTTP Basic): till orders, pre-order collection, the
//! kitchen/archive/sales views, and the confirmation email trigger.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use gateways::{
    HttpContactGateway, HttpEmailGateway, InMemoryContactGateway, InMemoryEmailGateway,
    Sha256AuthProvider,
};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use projections::ViewRefresher;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/contact", post(routes::contact::submit::<S>))
        .route("/preorders", post(routes::preorders::submit::<S>))
        .route("/preorders", get(routes::preorders::list::<S>))
        .route(
            "/preorders/{id}/collect",
            post(routes::preorders::collect::<S>),
        )
        .route(
            "/preorders/{id}/uncollect",
            post(routes::preorders::uncollect::<S>),
        )
        .route(
            "/preorders/{id}/confirmation",
            post(routes::preorders::send_confirmation::<S>),
        )
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/{id}", delete(routes::orders::delete::<S>))
        .route("/orders/{id}/status", post(routes::orders::set_status::<S>))
        .route(
            "/orders/items/{id}/toggle",
            post(routes::orders::toggle_item::<S>),
        )
        .route("/views/kitchen", get(routes::views::kitchen::<S>))
        .route("/views/archive", get(routes::views::archive::<S>))
        .route("/views/sales", get(routes::views::sales::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state wired from configuration.
///
/// Gateways fall back to in-memory implementations when their
/// endpoints are not configured, and admin access is denied entirely
/// when credentials are not configured.
pub fn create_default_state<S: OrderStore + Clone + 'static>(
    store: S,
    config: &Config,
) -> Arc<AppState<S>> {
    use domain::OrderService;
    use gateways::{AuthProvider, ContactGateway, EmailGateway};

    let email: Arc<dyn EmailGateway> = match (&config.email_api_url, &config.email_api_token) {
        (Some(url), Some(token)) => Arc::new(HttpEmailGateway::new(url, token)),
        _ => Arc::new(InMemoryEmailGateway::new()),
    };

    let contact: Arc<dyn ContactGateway> = match &config.contact_form_url {
        Some(url) => Arc::new(HttpContactGateway::new(url)),
        None => Arc::new(InMemoryContactGateway::new()),
    };

    let auth: Arc<dyn AuthProvider> =
        match (&config.admin_username, &config.admin_password_sha256) {
            (Some(username), Some(digest)) => Arc::new(Sha256AuthProvider::new(username, digest)),
            _ => {
                tracing::warn!("admin credentials not configured, denying all admin access");
                Arc::new(Sha256AuthProvider::deny_all())
            }
        };

    Arc::new(AppState {
        order_service: OrderService::new(store.clone()),
        views: Arc::new(ViewRefresher::new(store)),
        email,
        contact,
        auth,
    })
}
