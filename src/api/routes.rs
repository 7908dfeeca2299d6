//! HTTP API route definitions.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_check, create_url, health, index, list_urls, metrics_export, show_url, AppState,
};

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        // Sites
        .route("/urls", get(list_urls).post(create_url))
        .route("/urls/:id", get(show_url))
        .route("/urls/:id/checks", post(create_check))
        // Operations
        .route("/health", get(health))
        .route("/metrics", get(metrics_export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
