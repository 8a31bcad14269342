//! Application setup and server configuration.

use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::change_requests::HandlerRegistry;
use crate::server::routes::{
    approve_handler, cancel_handler, get_request_handler, health_handler,
    list_for_entity_handler, list_pending_handler, pending_count_handler, reject_handler,
    submit_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub registry: &'static HandlerRegistry,
}

impl AppState {
    /// State backed by the process-wide handler registry.
    pub fn new(db_pool: PgPool) -> Self {
        Self {
            db_pool,
            registry: HandlerRegistry::global(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/change-requests",
            post(submit_handler).get(list_pending_handler),
        )
        .route("/change-requests/pending-count", get(pending_count_handler))
        .route("/change-requests/:id", get(get_request_handler))
        .route("/change-requests/:id/approve", post(approve_handler))
        .route("/change-requests/:id/reject", post(reject_handler))
        .route("/change-requests/:id/cancel", post(cancel_handler))
        .route("/entities/:id/change-requests", get(list_for_entity_handler))
        .layer(Extension(state))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
