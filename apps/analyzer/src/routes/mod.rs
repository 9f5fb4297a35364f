pub mod health;
pub mod index;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route("/api/v1/analyze/pdf", post(handlers::handle_analyze_pdf))
        .route("/api/v1/report/pdf", post(handlers::handle_report_pdf))
        .with_state(state)
}
