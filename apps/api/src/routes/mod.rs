pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", post(handlers::handle_create_job))
        .route(
            "/api/v1/jobs/:id/resumes",
            post(handlers::handle_upload_resumes),
        )
        .route(
            "/api/v1/jobs/:id/results",
            get(handlers::handle_get_results),
        )
        .with_state(state)
}
