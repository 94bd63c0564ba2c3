// ============================================================================
// Order Service
// ============================================================================
//
// Order management for the Storefront platform. The gateway forwards requests
// with the /orders prefix intact. All order operations require a valid bearer
// token and only touch the caller's own orders.
//
// Storage is in-memory and single-instance (demo platform semantics).
//
// ============================================================================

mod handlers;
mod store;

use anyhow::{Context, Result};
use axum::{
    response::IntoResponse,
    routing::{get, put},
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
        store: Arc::new(store::OrderStore::default()),
        auth,
    };

    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/orders/", get(handlers::list).post(handlers::create))
        .route("/orders/stats", get(handlers::stats))
        .route("/orders/{order_id}", get(handlers::get))
        .route("/orders/{order_id}/status", put(handlers::update_status))
        .route("/orders/{order_id}/cancel", put(handlers::cancel))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Test hook: build the app with a fixed secret and default TTL
#[cfg(test)]
pub fn app_with_secret(secret: &str) -> Router {
    app(Arc::new(AuthManager::new(secret, 24)))
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy", "service": "order-service"}))
}

async fn index() -> impl IntoResponse {
    Json(json!({"message": "Order Service is running", "service": "order-service"}))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Order Service Starting ===");
    info!("Port: {}", config.port);

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl_hours));
    let app = app(auth);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Order Service listening on {}", config.bind_address);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
