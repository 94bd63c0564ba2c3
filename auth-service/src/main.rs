// ============================================================================
// Auth Service
// ============================================================================
//
// Authentication service for the Storefront platform:
// - User registration and login (bcrypt-hashed passwords)
// - JWT access tokens via the shared storefront-auth library
// - Token verification and profile management
//
// Storage is in-memory and single-instance (demo platform semantics).
//
// ============================================================================

mod handlers;
mod store;

use anyhow::{Context, Result};
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use storefront_auth::AuthManager;
use storefront_config::Config;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn app(auth: Arc<AuthManager>) -> Router {
    let state = handlers::AppState {
        store: Arc::new(store::UserStore::default()),
        auth,
    };

    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/verify", post(handlers::verify))
        .route(
            "/auth/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Test hook: build the app with a fixed secret and default TTL
#[cfg(test)]
pub fn app_with_secret(secret: &str) -> Router {
    app(Arc::new(AuthManager::new(secret, 24)))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy", "service": "auth-service"}))
}

async fn index() -> impl IntoResponse {
    Json(json!({"message": "Auth Service is running", "service": "auth-service"}))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Auth Service Starting ===");
    info!("Port: {}", config.port);

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl_hours));
    let app = app(auth);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Auth Service listening on {}", config.bind_address);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
