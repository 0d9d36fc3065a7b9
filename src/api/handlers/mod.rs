//! API request handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use tracing::error;
use tracing::warn;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::errors::ErrorKind;
use crate::errors::FeedbackError;
use crate::rag::FeedbackPipeline;

pub mod feedback;

pub use feedback::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<FeedbackPipeline>,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store = state.pipeline.retriever().store();
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        examples: store.len(),
        dimension: store.dimension(),
    }))
}

/// HTTP status for a failure kind
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidProfile | ErrorKind::InvalidArgument | ErrorKind::KExceedsStoreSize => {
            StatusCode::BAD_REQUEST
        }
        ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Embedding
        | ErrorKind::Completion
        | ErrorKind::NoJsonFound
        | ErrorKind::MalformedJson
        | ErrorKind::SchemaValidation => StatusCode::BAD_GATEWAY,
        ErrorKind::EmptyIndex | ErrorKind::IndexCorruption | ErrorKind::Config | ErrorKind::Io => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Pipeline failure rendered as an [`ApiResponse`] error body
#[derive(Debug)]
pub struct ApiError(pub FeedbackError);

impl From<FeedbackError> for ApiError {
    fn from(err: FeedbackError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        if status.is_server_error() {
            error!("Request failed ({}): {}", self.0.kind(), self.0);
        } else {
            warn!("Request rejected ({}): {}", self.0.kind(), self.0);
        }
        (status, Json(ApiResponse::<()>::from_error(&self.0))).into_response()
    }
}
