// ============================================================================
// Payment Service
// ============================================================================
//
// Payment processing for the Storefront platform, backed by a simulated
// processor (no real charges). The gateway forwards requests with the
// /payments prefix intact. All payment operations except the methods list
// require a valid bearer token.
//
// Storage is in-memory and single-instance (demo platform semantics).
//
// ============================================================================

mod handlers;
mod processor;
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

fn app(auth: Arc<AuthManager>, processor: processor::PaymentProcessor) -> Router {
    let state = handlers::AppState {
        store: Arc::new(store::PaymentStore::default()),
        processor,
        auth,
    };

    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/payments/", get(handlers::list).post(handlers::process))
        .route("/payments/methods", get(handlers::methods))
        .route("/payments/order/{order_id}", get(handlers::get_by_order))
        .route("/payments/{payment_id}", get(handlers::get))
        .route("/payments/{payment_id}/refund", post(handlers::refund))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Test hook: fixed secret, instant processor with a forced outcome
#[cfg(test)]
pub fn app_for_tests(secret: &str, succeed: bool) -> Router {
    app(
        Arc::new(AuthManager::new(secret, 24)),
        processor::PaymentProcessor::forced(succeed),
    )
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy", "service": "payment-service"}))
}

async fn index() -> impl IntoResponse {
    Json(json!({"message": "Payment Service is running", "service": "payment-service"}))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Payment Service Starting ===");
    info!("Port: {}", config.port);

    let auth = Arc::new(AuthManager::new(&config.jwt_secret, config.token_ttl_hours));
    let app = app(auth, processor::PaymentProcessor::new());

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Payment Service listening on {}", config.bind_address);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
