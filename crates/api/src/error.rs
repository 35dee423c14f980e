//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// The addressed record does not exist.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// The write would break a uniqueness or reference constraint.
    Conflict(String),
    /// Anything the client cannot fix.
    Internal(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DomainError::InvalidOrderState(_)
            | DomainError::InvalidUserRole(_)
            | DomainError::InvalidAmount(_) => ApiError::BadRequest(err.to_string()),
            DomainError::Conflict(_) => ApiError::Conflict(err.to_string()),
            DomainError::PasswordHash(_) | DomainError::Repository(_) => ApiError::Internal(err),
        }
    }
}
