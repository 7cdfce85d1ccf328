use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::normalizer::NormalizeError;
use crate::resolver::ResolveError;
use crate::service::SearchError;

use super::models::ErrorResponse;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Search(SearchError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Search(SearchError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            ApiError::Search(SearchError::Store(e)) => {
                tracing::error!("Store error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::Resolve(ResolveError::Configuration(msg)) => {
                tracing::warn!("Source resolution unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Source resolution is not configured".to_string(),
                )
            }
            ApiError::Resolve(ResolveError::Upstream(e)) => {
                tracing::warn!("Gemini error: {:#}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Gemini service is unavailable".to_string(),
                )
            }
            ApiError::Resolve(ResolveError::Normalize(e)) => {
                tracing::warn!("Unusable Gemini response: {}", e);
                let message = match e {
                    NormalizeError::Empty => "Gemini returned an empty response",
                    NormalizeError::Malformed { .. } => "Gemini did not return JSON",
                };
                (StatusCode::BAD_GATEWAY, message.to_string())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
