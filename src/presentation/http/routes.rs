//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{middleware, routing::get, Router};

use super::handlers;
use crate::presentation::middleware::basic_auth_middleware;
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .with_state(state)
}

/// API v1 routes (require authentication)
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::account::me))
        .route_layer(middleware::from_fn_with_state(state, basic_auth_middleware))
}
