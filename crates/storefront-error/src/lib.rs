// ============================================================================
// Storefront Error - Shared application error type
// ============================================================================
//
// One error enum for all Storefront services, providing structured error
// information for logging and user-facing JSON responses.
//
// ============================================================================

use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type shared by the gateway and all backend services
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Authentication & Authorization =====
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // ===== Validation =====
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    // ===== Gateway routing =====
    /// Upstream could not be reached (connection refused, timeout, DNS)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The matched route has no upstream URL configured; carries the name of
    /// the missing environment variable
    #[error("Service URL not configured: {0}")]
    RouteNotConfigured(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    // ===== Serialization =====
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== HTTP client =====
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // ===== Internal =====
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::RouteNotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Http(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) | AppError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-facing error message.
    ///
    /// Gateway routing errors keep their detail (the route contract requires
    /// the failure reason and the missing variable name in the body); only
    /// internal errors are masked.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Auth(msg) => msg.clone(),
            AppError::Jwt(_) => "Invalid or expired token".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::ServiceUnavailable(detail) => format!("Service unavailable: {}", detail),
            AppError::RouteNotConfigured(var) => format!("Service URL not configured: {}", var),
            AppError::MethodNotAllowed => "Method not allowed".to_string(),
            AppError::Json(e) => format!("Invalid JSON: {}", e),
            AppError::Http(_) => "Upstream service error".to_string(),
            AppError::Internal(_) | AppError::Unknown(_) => "Internal server error".to_string(),
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::Jwt(_) => "JWT_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::RouteNotConfigured(_) => "SERVICE_NOT_CONFIGURED",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Http(_) => "UPSTREAM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
            AppError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                error_code = %code,
                "Authentication failed"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let body = json!({
            "error": self.user_message(),
            "error_code": self.error_code(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

// ============================================================================
// Helper functions for creating common errors
// ============================================================================

impl AppError {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        AppError::Auth(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    /// Create a conflict error (409)
    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    /// Create an internal server error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

// ============================================================================
// JSON body field helpers
// ============================================================================

/// Helpers for pulling required/optional fields out of free-form JSON bodies,
/// producing the platform's uniform 400 envelopes.
pub mod fields {
    use super::{AppError, AppResult};
    use serde_json::Value;

    /// Require a string field, erroring with the field's name when absent
    pub fn require_str<'a>(body: &'a Value, field: &str) -> AppResult<&'a str> {
        body.get(field).and_then(Value::as_str).ok_or_else(|| {
            AppError::validation(format!("Missing required field: {}", field))
        })
    }

    /// Require a numeric field (integers accepted)
    pub fn require_f64(body: &Value, field: &str) -> AppResult<f64> {
        body.get(field).and_then(Value::as_f64).ok_or_else(|| {
            AppError::validation(format!("Missing required field: {}", field))
        })
    }

    /// Optional string field with a default
    pub fn str_or<'a>(body: &'a Value, field: &str, default: &'a str) -> &'a str {
        body.get(field).and_then(Value::as_str).unwrap_or(default)
    }

    /// Optional integer field with a default
    pub fn i64_or(body: &Value, field: &str, default: i64) -> i64 {
        body.get(field).and_then(Value::as_i64).unwrap_or(default)
    }
}
