use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::screening::semantic::SemanticError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    #[error("Semantic service unavailable: {0}")]
    SemanticUnavailable(String),

    #[error("Semantic service returned malformed output: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat(_) => AppError::UnsupportedFormat(err.to_string()),
            ExtractError::Corrupt { .. } => AppError::CorruptDocument(err.to_string()),
        }
    }
}

impl From<SemanticError> for AppError {
    fn from(err: SemanticError) -> Self {
        match err {
            SemanticError::Unavailable(msg) => AppError::SemanticUnavailable(msg),
            SemanticError::Malformed(msg) => AppError::MalformedResponse(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::UnsupportedFormat(msg) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", msg.clone())
            }
            AppError::CorruptDocument(msg) => {
                (StatusCode::BAD_REQUEST, "CORRUPT_DOCUMENT", msg.clone())
            }
            AppError::SemanticUnavailable(msg) => {
                tracing::error!("Semantic service error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SEMANTIC_UNAVAILABLE",
                    "The semantic analysis service is unavailable".to_string(),
                )
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed semantic response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "SEMANTIC_MALFORMED",
                    "The semantic analysis service returned an unusable response".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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
