//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::errors::FeedbackError;
use crate::models::BehavioralProfile;
use crate::models::Example;
use crate::models::FeedbackResult;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Failure kind from the error taxonomy, e.g. `NoJsonFoundError`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Offending model text for response-validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            raw_output: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: None,
            raw_output: None,
        }
    }

    pub fn from_error(err: &FeedbackError) -> Self {
        Self {
            error_kind: Some(err.kind().to_string()),
            raw_output: err.raw_output().map(str::to_string),
            ..Self::error(err.to_string())
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub examples: usize,
    pub dimension: usize,
}

/// Feedback request
#[derive(Debug, Deserialize)]
pub struct FeedbackApiRequest {
    pub query: String,
    /// Raw profile object, decoded by [`FeedbackApiRequest::profile`]
    pub profile: serde_json::Value,
    /// Examples to retrieve; server default when absent
    #[serde(default)]
    pub k: Option<usize>,
    /// Echo retrieved examples and the composed prompt
    #[serde(default)]
    pub include_details: bool,
}

impl FeedbackApiRequest {
    /// Decode the behavioral profile; any field that fails to decode is an invalid profile
    pub fn profile(&self) -> Result<BehavioralProfile, FeedbackError> {
        BehavioralProfile::deserialize(&self.profile)
            .map_err(|e| FeedbackError::InvalidProfile(e.to_string()))
    }
}

/// Feedback response
#[derive(Debug, Serialize)]
pub struct FeedbackApiResponse {
    #[serde(flatten)]
    pub result: FeedbackResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Example search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Hits to return; server default when absent
    #[serde(default)]
    pub k: Option<usize>,
}

/// One search hit, closest first
#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub example: Example,
    pub distance: f32,
}
