pub mod candidates;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/candidates/analyze",
            post(candidates::handle_analyze),
        )
        .route("/api/v1/candidates/batch", post(candidates::handle_batch))
        .with_state(state)
}
