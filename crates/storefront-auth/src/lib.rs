// ============================================================================
// Storefront Auth - Shared JWT authentication
// ============================================================================
//
// One JWT implementation for the whole platform: auth-service signs tokens,
// every other service verifies them through the same AuthManager and the
// AuthUser extractor. This replaces per-service decode logic.
//
// ============================================================================

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_error::{AppError, AppResult};
use uuid::Uuid;

/// JWT claims carried by Storefront access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID) as string
    pub sub: String,
    pub email: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued at, seconds since epoch
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::auth("Invalid user id in token"))
    }
}

/// Issues and verifies HS256 access tokens
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_hours: i64,
}

impl AuthManager {
    pub fn new(secret: &str, token_ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_hours,
        }
    }

    /// Issue an access token for a user
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (now + Duration::hours(self.token_ttl_hours)).timestamp(),
            iat: now.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify a token and return its claims; expired or tampered tokens fail
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

/// Extract the bearer token from an Authorization header value
fn bearer_token(header: &str) -> AppResult<&str> {
    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth("Authorization token required"))
}

/// Authenticated user, extracted from the request's bearer token.
///
/// Usable by any service whose state exposes `Arc<AuthManager>` via `FromRef`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AuthManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let manager = Arc::<AuthManager>::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::auth("Authorization token required"))?;

        let token = bearer_token(header)?;
        let claims = manager.verify_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            e
        })?;

        Ok(AuthUser {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_roundtrip() {
        let manager = AuthManager::new("test-secret", 24);
        let user_id = Uuid::new_v4();

        let token = manager.issue_token(user_id, "user@example.com").unwrap();
        let claims = manager.verify_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL puts exp well past the default leeway
        let manager = AuthManager::new("test-secret", -2);
        let token = manager
            .issue_token(Uuid::new_v4(), "user@example.com")
            .unwrap();

        assert!(manager.verify_token(&token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let signer = AuthManager::new("secret-a", 24);
        let verifier = AuthManager::new("secret-b", 24);

        let token = signer
            .issue_token(Uuid::new_v4(), "user@example.com")
            .unwrap();

        assert!(verifier.verify_token(&token).is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert!(bearer_token("Token abc").is_err());
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
    }
}
