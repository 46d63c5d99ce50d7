//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        // Analysis API (v1)
        .route(
            "/v1/analyses/description",
            post(handlers::analyses::submit_description),
        )
        .route(
            "/v1/analyses/codebase",
            post(handlers::analyses::submit_codebase),
        )
        .route(
            "/v1/analyses/{id}/status",
            get(handlers::analyses::get_status),
        )
        .route(
            "/v1/analyses/{id}/result",
            get(handlers::analyses::get_result),
        )
        // Attach state
        .with_state(state)
}
