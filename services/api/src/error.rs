//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kitchen::{DomainError, ErrorKind};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed or expired credentials
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("{0}")]
    BadRequest(String),

    /// Request flags that cannot be honoured together
    #[error("{0}")]
    Conflict(String),

    /// Failure reported by the kitchen
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Domain(err) => {
                let status = match err.kind() {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::UserNotFound => StatusCode::UNAUTHORIZED,
                    ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                    ErrorKind::RecipeScraperFailure => StatusCode::BAD_REQUEST,
                    ErrorKind::Internal => {
                        error!("Internal error: {}", err);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.message().to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::DatabaseError;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        assert_eq!(status_of(DomainError::NotFound.into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::UserNotFound.into()), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(DomainError::Forbidden.into()), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(DomainError::Internal("boom".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(DomainError::Database(DatabaseError::Constraint("dup".to_string())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_only_errors() {
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::BadRequest("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Conflict("nope".to_string())),
            StatusCode::CONFLICT
        );
    }
}
