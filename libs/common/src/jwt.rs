//! JWT service for token issuance and validation
//!
//! Tokens are HS256-signed and carry the user id as subject. Both the auth
//! service (which issues tokens) and the API service (which validates them)
//! share this module so the claims layout cannot drift between them.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Issuer stamped into every token
pub const TOKEN_ISSUER: &str = "recipe-wizard";

/// Default and maximum token lifetime in seconds (24 hours)
pub const DEFAULT_TOKEN_EXPIRY: u64 = 86_400;

/// Errors raised while configuring, issuing or validating tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// Configuration is missing or unusable
    #[error("Token configuration error: {0}")]
    Configuration(String),

    /// The token could not be signed
    #[error("Failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// The token is malformed, expired or carries a bad signature
    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// The system clock is before the unix epoch
    #[error("Failed to get current time")]
    Clock,
}

/// Type alias for Result with TokenError
pub type TokenResult<T> = Result<T, TokenError>;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Token lifetime in seconds; also the longest lifetime a caller may request
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Secret used for HS256 signing (required)
    /// - `JWT_TOKEN_EXPIRY`: Token expiry in seconds (default: 86400)
    pub fn from_env() -> TokenResult<Self> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| {
            TokenError::Configuration("JWT_SECRET environment variable not set".to_string())
        })?;

        if secret.is_empty() {
            return Err(TokenError::Configuration(
                "JWT_SECRET must not be empty".to_string(),
            ));
        }

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| DEFAULT_TOKEN_EXPIRY.to_string())
            .parse()
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Issuer
    pub iss: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[TOKEN_ISSUER]);

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Lifetime granted for a requested expiry.
    ///
    /// Missing, non-positive or oversized requests get the configured maximum.
    pub fn token_lifetime(&self, requested_seconds: Option<i64>) -> u64 {
        match requested_seconds {
            Some(seconds) if seconds > 0 && (seconds as u64) <= self.config.token_expiry => {
                seconds as u64
            }
            _ => self.config.token_expiry,
        }
    }

    /// Issue a token for a user
    pub fn issue_token(&self, user_id: Uuid, requested_seconds: Option<i64>) -> TokenResult<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TokenError::Clock)?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            iss: TOKEN_ISSUER.to_string(),
            iat: now,
            exp: now + self.token_lifetime(requested_seconds),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Encode)
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> TokenResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(TokenError::Invalid)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig {
            secret: secret.to_string(),
            token_expiry: 3600,
        })
    }

    #[test]
    fn test_issue_and_validate_token() {
        let jwt = service("test-secret");
        let user_id = Uuid::new_v4();

        let token = jwt.issue_token(user_id, None).unwrap();
        let claims = jwt.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = service("one-secret").issue_token(Uuid::new_v4(), None).unwrap();
        let result = service("another-secret").validate_token(&token);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = service("test-secret");
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(jwt.validate_token(&token).is_err());
    }

    #[test]
    fn test_token_lifetime_is_clamped() {
        let jwt = service("test-secret");
        assert_eq!(jwt.token_lifetime(None), 3600);
        assert_eq!(jwt.token_lifetime(Some(0)), 3600);
        assert_eq!(jwt.token_lifetime(Some(-5)), 3600);
        assert_eq!(jwt.token_lifetime(Some(60)), 60);
        assert_eq!(jwt.token_lifetime(Some(999_999)), 3600);
    }

    #[test]
    #[serial]
    fn test_jwt_config_from_env() {
        unsafe {
            std::env::set_var("JWT_SECRET", "from-env");
            std::env::remove_var("JWT_TOKEN_EXPIRY");
        }

        let config = JwtConfig::from_env().unwrap();
        assert_eq!(config.secret, "from-env");
        assert_eq!(config.token_expiry, DEFAULT_TOKEN_EXPIRY);

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        assert!(JwtConfig::from_env().is_err());
    }
}
