use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::Recommendation;

/// A playlist publish failure together with the recommendation that was
/// already computed, so the caller can retry publishing without rerunning
/// the pipeline.
#[derive(Debug)]
pub struct PublishFailure {
    pub reason: String,
    pub recommendation: Recommendation,
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Catalog provider error: {0}")]
    Provider(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Feature schema error: {0}")]
    Schema(String),

    #[error("Playlist publish error: {}", .0.reason)]
    Publish(PublishFailure),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable tag used in logs and error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Provider(_) | AppError::HttpClient(_) => "provider",
            AppError::Schema(_) => "schema",
            AppError::Publish(_) => "publish",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = self.to_string();

        let (status, body) = match self {
            AppError::InvalidInput(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "kind": kind }),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message, "kind": kind }),
            ),
            AppError::Provider(_) | AppError::HttpClient(_) | AppError::Schema(_) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": message, "kind": kind }),
            ),
            AppError::Publish(failure) => (
                StatusCode::BAD_GATEWAY,
                json!({
                    "error": message,
                    "kind": kind,
                    "tracks": failure.recommendation.track_ids(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
