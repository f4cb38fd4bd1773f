//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Geocoding
        .route("/api/v1/geocode", get(handlers::geocode))
        .route("/api/v1/stats", get(handlers::get_stats))

        .with_state(state)
}
