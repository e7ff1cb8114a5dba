use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of one step of the screening pipeline.
///
/// The variant decides the retry policy: Validation is never retried, Quota
/// waits out a long cooldown, Transient backs off exponentially, NotFound is
/// degraded to an empty result by the caller where that makes sense.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScreeningError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Quota exceeded: {0}")]
    Quota(String),

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ScreeningError {
    pub fn is_quota(&self) -> bool {
        matches!(self, ScreeningError::Quota(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ScreeningError::Quota(_) | ScreeningError::Transient(_))
    }
}

/// HTTP-facing error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<ScreeningError> for AppError {
    fn from(err: ScreeningError) -> Self {
        match err {
            ScreeningError::Validation(msg) => AppError::Validation(msg),
            ScreeningError::NotFound(msg) => AppError::Validation(format!("not found: {msg}")),
            ScreeningError::Quota(msg) => AppError::RateLimited(msg),
            ScreeningError::Transient(msg) => AppError::Upstream(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RateLimited(msg) => {
                tracing::warn!("Quota exhausted: {msg}");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    "External quota exhausted, retry later".to_string(),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "An external service failed".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
