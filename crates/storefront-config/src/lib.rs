// ============================================================================
// Storefront Config - Centralized configuration management
// ============================================================================
//
// This crate provides centralized configuration for all Storefront services.
// Supports loading from environment variables with sensible defaults.
//
// ============================================================================

mod gateway;

pub use gateway::{GatewayConfig, UpstreamsConfig};

use anyhow::Result;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Main configuration structure for Storefront services
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,

    /// Shared HS256 secret used by auth-service to sign tokens and by the
    /// other services to verify them
    pub jwt_secret: String,

    /// Access token TTL in hours
    pub token_ttl_hours: i64,

    pub rust_log: String,

    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            port,
            bind_address: format!("0.0.0.0:{}", port),

            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "storefront-platform-auth-secret-key".to_string()),

            token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_HOURS),

            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),

            gateway: GatewayConfig::from_env(),
        })
    }
}
