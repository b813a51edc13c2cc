use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::platform_api::PlatformApiError;
use crate::services::assessment_flow::FlowError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Rate limited by platform API")]
    RateLimited,
    #[error("External error: {0}")]
    External(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (StatusCode::TOO_MANY_REQUESTS, headers, "Rate limited").into_response()
            },
            AppError::External(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
        }
    }
}

impl From<PlatformApiError> for AppError {
    fn from(value: PlatformApiError) -> Self {
        match value {
            PlatformApiError::NotFound => AppError::NotFound,
            PlatformApiError::RateLimited => AppError::RateLimited,
            other => AppError::External(other.to_string()),
        }
    }
}

impl From<FlowError> for AppError {
    fn from(value: FlowError) -> Self {
        match value {
            FlowError::EmptyTemplate | FlowError::UnknownOption { .. } | FlowError::Unanswered(_) => {
                AppError::Validation(value.to_string())
            }
            FlowError::InvalidTransition { .. }
            | FlowError::SubmissionInProgress
            | FlowError::AlreadySubmitted => AppError::Conflict(value.to_string()),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}
