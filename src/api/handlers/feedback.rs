//! Feedback and example search handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::info;

use super::ApiError;
use super::AppState;
use crate::api::types::*;
use crate::errors::FeedbackError;
use crate::rag::FeedbackRequest;

/// Malformed or mistyped request bodies are client errors with a JSON error body
fn rejected(rejection: JsonRejection) -> ApiError {
    ApiError(FeedbackError::InvalidArgument(rejection.body_text()))
}

/// Classify a query and generate personalized feedback
pub async fn feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackApiRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<FeedbackApiResponse>>, ApiError> {
    let Json(req) = payload.map_err(rejected)?;
    info!("POST /api/feedback ({} chars)", req.query.len());

    let profile = req.profile()?;
    let k = req.k.unwrap_or_else(|| state.pipeline.default_k());
    let response = state
        .pipeline
        .run(FeedbackRequest {
            query: req.query,
            profile,
            k,
        })
        .await?;

    let (examples, prompt) = if req.include_details {
        (Some(response.examples), Some(response.prompt))
    } else {
        (None, None)
    };

    Ok(Json(ApiResponse::success(FeedbackApiResponse {
        result: response.result,
        examples,
        prompt,
    })))
}

/// Closest labeled examples for a query
pub async fn search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<SearchHit>>>, ApiError> {
    let Json(req) = payload.map_err(rejected)?;
    let k = req.k.unwrap_or_else(|| state.pipeline.default_k());
    info!("POST /api/search: k={}", k);

    let hits = state
        .pipeline
        .retriever()
        .retrieve_scored(&req.query, k)
        .await?
        .into_iter()
        .map(|scored| SearchHit {
            example: scored.example,
            distance: scored.distance,
        })
        .collect();

    Ok(Json(ApiResponse::success(hits)))
}
