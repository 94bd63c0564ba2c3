// ============================================================================
// Voice Assistant Service
// ============================================================================
//
// Placeholder service: only the health probes respond. The gateway forwards
// requests with the /voice-assistant prefix intact.
//
// ============================================================================

use anyhow::{Context, Result};
use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/voice-assistant/health", get(health))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = storefront_config::Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Voice Assistant Service Starting ===");
    info!("Port: {}", config.port);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Voice Assistant Service listening on {}", config.bind_address);

    axum::serve(listener, app())
        .await
        .context("Failed to start server")?;

    Ok(())
}
