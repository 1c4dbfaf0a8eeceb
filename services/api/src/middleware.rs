//! Bearer token authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use kitchen::DomainError;
use tracing::{debug, warn};

use crate::{error::ApiError, state::AppState};

/// Resolve the bearer token to a [`kitchen::models::User`] and attach it to
/// the request extensions. Tokens naming a user that no longer exists are
/// rejected like invalid ones.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(bearer.token())
        .map_err(|e| {
            debug!("Rejected token: {}", e);
            ApiError::Unauthorized
        })?;

    let user = state.kitchen.get_user(claims.sub).await.map_err(|e| match e {
        DomainError::UserNotFound => {
            warn!("Token subject {} does not exist", claims.sub);
            ApiError::Unauthorized
        }
        other => other.into(),
    })?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
