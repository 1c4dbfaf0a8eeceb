//! Authentication service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use common::error::DatabaseError;
use kitchen::DomainError;
use kitchen::models::{NewUser, User};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::AppState;
use crate::error::AuthError;
use crate::password::{hash_password, verify_password};
use crate::validation::{validate_display_name, validate_password, validate_username};

/// Request for account registration
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub expires_in_seconds: Option<i64>,
}

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub expires_in_seconds: Option<i64>,
}

/// Response carrying a bearer token
#[derive(Serialize)]
pub struct TokenResponse {
    pub user: User,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(register))
        .route("/login", post(login))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

fn token_response(
    state: &AppState,
    user: User,
    expires_in_seconds: Option<i64>,
) -> Result<TokenResponse, AuthError> {
    let access_token = state
        .jwt_service
        .issue_token(user.id, expires_in_seconds)
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            AuthError::Internal(e.to_string())
        })?;

    Ok(TokenResponse {
        user,
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.token_lifetime(expires_in_seconds),
    })
}

/// Account registration endpoint
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Registration attempt for user: {}", payload.username);

    validate_username(&payload.username).map_err(AuthError::Validation)?;
    validate_password(&payload.password).map_err(AuthError::Validation)?;
    validate_display_name("First name", payload.first_name.as_deref())
        .map_err(AuthError::Validation)?;
    validate_display_name("Last name", payload.last_name.as_deref())
        .map_err(AuthError::Validation)?;

    match state.kitchen.get_user_by_username(&payload.username).await {
        Ok(_) => return Err(AuthError::UsernameTaken),
        Err(DomainError::UserNotFound) => {}
        Err(e) => {
            error!("Failed to look up user {}: {}", payload.username, e);
            return Err(e.into());
        }
    }

    let hashed_password = hash_password(&payload.password).map_err(AuthError::Internal)?;

    let user = state
        .kitchen
        .create_user(&NewUser {
            username: payload.username,
            hashed_password,
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await
        .map_err(|e| match e {
            DomainError::Database(DatabaseError::Constraint(_)) => AuthError::UsernameTaken,
            other => {
                error!("Failed to create user: {}", other);
                other.into()
            }
        })?;

    let response = token_response(&state, user, payload.expires_in_seconds)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    info!("Login attempt for user: {}", payload.username);

    if !state.rate_limiter.is_allowed(&payload.username).await {
        warn!("Rate limit hit for user: {}", payload.username);
        return Err(AuthError::TooManyAttempts);
    }

    let user = state.kitchen.get_user_by_username(&payload.username).await?;

    let valid =
        verify_password(&payload.password, &user.hashed_password).map_err(AuthError::Internal)?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    state.rate_limiter.reset(&payload.username).await;

    let response = token_response(&state, user, payload.expires_in_seconds)?;
    Ok((StatusCode::OK, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limiter::{RateLimiter, RateLimiterConfig};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use common::jwt::{JwtConfig, JwtService};
    use kitchen::Kitchen;
    use kitchen::scraper::{HttpScraper, ScraperConfig};
    use kitchen::store::MemoryStore;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        let scraper = HttpScraper::new(&ScraperConfig::default()).unwrap();
        AppState {
            kitchen: Kitchen::new(Arc::new(MemoryStore::new()), Arc::new(scraper)),
            jwt_service: JwtService::new(JwtConfig {
                secret: "test-secret".to_string(),
                token_expiry: 3600,
            }),
            rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
        }
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = state();
        let app = create_router(state.clone());

        let (status, body) = post(
            &app,
            "/users",
            json!({"username": "julia", "password": "bon-appetit", "first_name": "Julia"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["username"], "julia");
        assert!(body["user"].get("hashed_password").is_none());

        let (status, body) = post(
            &app,
            "/login",
            json!({"username": "julia", "password": "bon-appetit", "expires_in_seconds": 60}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expires_in"], 60);

        let token = body["access_token"].as_str().unwrap();
        let claims = state.jwt_service.validate_token(token).unwrap();
        assert_eq!(claims.sub.to_string(), body["user"]["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_and_duplicate_usernames() {
        let app = create_router(state());

        let (status, _) = post(
            &app,
            "/users",
            json!({"username": "no spaces", "password": "longenough"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(&app, "/users", json!({"username": "julia", "password": "short"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post(
            &app,
            "/users",
            json!({"username": "julia", "password": "longenough"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = post(
            &app,
            "/users",
            json!({"username": "julia", "password": "longenough"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "username is already taken");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let app = create_router(state());

        let (status, _) = post(
            &app,
            "/login",
            json!({"username": "ghost", "password": "whatever1"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        post(&app, "/users", json!({"username": "julia", "password": "longenough"})).await;
        let (status, body) = post(
            &app,
            "/login",
            json!({"username": "julia", "password": "wrong-password"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "invalid username or password");
    }

    #[tokio::test]
    async fn test_login_is_rate_limited() {
        let app = create_router(state());

        for _ in 0..5 {
            let (status, _) = post(
                &app,
                "/login",
                json!({"username": "ghost", "password": "whatever1"}),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let (status, _) = post(
            &app,
            "/login",
            json!({"username": "ghost", "password": "whatever1"}),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }
}
