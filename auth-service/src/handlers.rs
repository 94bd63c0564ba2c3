// ============================================================================
// Auth handlers
// ============================================================================
//
// Registration, login, token verification and profile management. Tokens are
// issued and verified by the shared storefront-auth AuthManager.
//
// ============================================================================

use crate::store::{User, UserStore};
use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront_auth::{AuthManager, AuthUser};
use storefront_error::{
    fields::{require_str, str_or},
    AppError, AppResult,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub auth: Arc<AuthManager>,
}

impl FromRef<AppState> for Arc<AuthManager> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let email = require_str(&body, "email")?.to_string();
    let password = require_str(&body, "password")?;
    let first_name = require_str(&body, "first_name")?.to_string();
    let last_name = require_str(&body, "last_name")?.to_string();

    if state.store.find_by_email(&email).await.is_some() {
        return Err(AppError::conflict("User with this email already exists"));
    }

    let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let user = User {
        id: Uuid::new_v4(),
        email: email.clone(),
        password_hash,
        first_name,
        last_name,
        phone: str_or(&body, "phone", "").to_string(),
        address: str_or(&body, "address", "").to_string(),
        created_at: Utc::now(),
    };

    let token = state.auth.issue_token(user.id, &email)?;
    let profile = user.profile();
    state.store.insert(user).await;

    tracing::info!(email = %email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": profile,
            "token": token,
        })),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let email = require_str(&body, "email")?;
    let password = require_str(&body, "password")?;

    let user = state
        .store
        .find_by_email(email)
        .await
        .ok_or_else(|| AppError::auth("Invalid email or password"))?;

    let valid = bcrypt::verify(password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !valid {
        return Err(AppError::auth("Invalid email or password"));
    }

    let token = state.auth.issue_token(user.id, &user.email)?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": user.profile(),
        "token": token,
    })))
}

/// POST /auth/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::validation("Token is required"))?;

    let claims = state.auth.verify_token(token)?;
    let user = state
        .store
        .get(claims.user_id()?)
        .await
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(json!({
        "valid": true,
        "user": user.profile(),
    })))
}

/// GET /auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Value>> {
    let user = state
        .store
        .get(user.user_id)
        .await
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(json!({"user": user.profile()})))
}

/// PUT /auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<Value>,
) -> AppResult<Json<Value>> {
    let profile = state
        .store
        .update(user.user_id, |u| {
            if let Some(v) = body.get("first_name").and_then(Value::as_str) {
                u.first_name = v.to_string();
            }
            if let Some(v) = body.get("last_name").and_then(Value::as_str) {
                u.last_name = v.to_string();
            }
            if let Some(v) = body.get("phone").and_then(Value::as_str) {
                u.phone = v.to_string();
            }
            if let Some(v) = body.get("address").and_then(Value::as_str) {
                u.address = v.to_string();
            }
        })
        .await
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": profile,
    })))
}
