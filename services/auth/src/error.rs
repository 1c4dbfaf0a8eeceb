//! Authentication service errors

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kitchen::{DomainError, ErrorKind};
use thiserror::Error;
use tracing::error;

/// Errors returned by the authentication endpoints
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("the user with the given username does not exist")]
    UserNotFound,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username is already taken")]
    UsernameTaken,

    #[error("too many login attempts, try again later")]
    TooManyAttempts,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        match err.kind() {
            ErrorKind::UserNotFound => AuthError::UserNotFound,
            ErrorKind::NotFound
            | ErrorKind::Forbidden
            | ErrorKind::RecipeScraperFailure
            | ErrorKind::Internal => AuthError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::UserNotFound | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UsernameTaken => StatusCode::CONFLICT,
            AuthError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Internal(message) => {
                error!("Internal error: {}", message);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match self {
            AuthError::Internal(_) => "something went wrong".to_string(),
            other => other.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
