//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Feedback generation
        .route("/feedback", post(handlers::feedback))
        // Nearest labeled examples
        .route("/search", post(handlers::search))
        .with_state(state)
}
