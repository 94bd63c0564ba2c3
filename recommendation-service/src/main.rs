// ============================================================================
// Recommendation Service
// ============================================================================
//
// Mock "AI" recommendations over a fixed demo catalog. The gateway forwards
// requests with the /recommendations prefix intact.
//
// ============================================================================

mod engine;

use anyhow::{Context, Result};
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use storefront_error::AppResult;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/recommendations/health", get(health))
        .route("/recommendations/personalized", post(personalized))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "AI Recommendation Service"}))
}

fn string_list(body: &Value, field: &str) -> Vec<String> {
    body.get(field)
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

async fn personalized(body: Option<Json<Value>>) -> AppResult<Json<Value>> {
    let body = body.map(|Json(v)| v).unwrap_or_else(|| json!({}));

    let viewed = string_list(&body, "viewed_products");
    let purchased = string_list(&body, "purchased_products");
    let cart = string_list(&body, "cart_items");
    let limit = body
        .get("limit")
        .and_then(Value::as_u64)
        .unwrap_or(6) as usize;

    let recommendations = engine::personalized(&viewed, &purchased, &cart, limit);

    Ok(Json(json!({
        "status": "success",
        "user_id": body.get("user_id").cloned().unwrap_or(Value::Null),
        "recommendations": recommendations,
        "algorithm": "Hybrid (Collaborative + Content-based)",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = storefront_config::Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Recommendation Service Starting ===");
    info!("Port: {}", config.port);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Recommendation Service listening on {}", config.bind_address);

    axum::serve(listener, app())
        .await
        .context("Failed to start server")?;

    Ok(())
}
