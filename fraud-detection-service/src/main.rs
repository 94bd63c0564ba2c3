// ============================================================================
// Fraud Detection Service
// ============================================================================
//
// Mock "AI" transaction risk scoring. The gateway forwards requests with the
// /fraud-detection prefix intact.
//
// ============================================================================

mod risk;

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
        .route("/fraud-detection/health", get(health))
        .route(
            "/fraud-detection/analyze-transaction",
            post(analyze_transaction),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "AI Fraud Detection Service"}))
}

fn country_of(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(|a| a.get("country"))
        .and_then(Value::as_str)
        .unwrap_or("US")
        .to_string()
}

async fn analyze_transaction(body: Option<Json<Value>>) -> AppResult<Json<Value>> {
    let body = body.map(|Json(v)| v).unwrap_or_else(|| json!({}));

    let tx = risk::Transaction {
        amount: body.get("amount").and_then(Value::as_f64).unwrap_or(0.0),
        billing_country: country_of(&body, "billing_address"),
        shipping_country: country_of(&body, "shipping_address"),
    };

    let analysis = risk::analyze(&tx);
    let overall = analysis.overall();
    let (risk_level, recommendation) = risk::assess(overall);

    tracing::info!(overall, risk_level, "Transaction analyzed");

    Ok(Json(json!({
        "status": "success",
        "transaction_id": body.get("transaction_id").cloned().unwrap_or(Value::Null),
        "risk_analysis": analysis.detail,
        "overall_risk_score": overall,
        "risk_level": risk_level,
        "recommendation": recommendation,
        "algorithm": "Multi-layer AI Fraud Detection",
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

    info!("=== Fraud Detection Service Starting ===");
    info!("Port: {}", config.port);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Fraud Detection Service listening on {}", config.bind_address);

    axum::serve(listener, app())
        .await
        .context("Failed to start server")?;

    Ok(())
}
