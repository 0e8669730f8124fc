//! HTTP-facing error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors a handler can return. Each maps to a fixed status and JSON body:
/// `{"error": ...}` for 400s, `{"error": ..., "details": ...}` otherwise.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request field is missing or empty.
    #[error("{0}")]
    BadRequest(&'static str),

    /// The request body is not a JSON object of the expected shape.
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Something failed after the request was accepted.
    #[error("{error}: {details}")]
    Internal { error: &'static str, details: String },
}

impl ApiError {
    pub fn internal(error: &'static str, source: impl std::fmt::Display) -> Self {
        Self::Internal {
            error,
            details: source.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(error) => (StatusCode::BAD_REQUEST, serde_json::json!({ "error": error })),
            Self::InvalidJson(e) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Invalid JSON body", "details": e.to_string() }),
            ),
            Self::Internal { error, details } => {
                tracing::error!(%details, "{}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": error, "details": details }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
