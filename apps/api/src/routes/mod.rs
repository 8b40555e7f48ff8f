pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/matching", post(handlers::handle_match))
        .route(
            "/api/v1/matching/reconcile",
            post(handlers::handle_reconcile),
        )
        .with_state(state)
}
