// ============================================================================
// Dynamic Pricing Service
// ============================================================================
//
// Placeholder service: only the health probes respond. The gateway forwards
// requests with the /dynamic-pricing prefix intact.
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
        .route("/dynamic-pricing/health", get(health))
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

    info!("=== Dynamic Pricing Service Starting ===");
    info!("Port: {}", config.port);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Dynamic Pricing Service listening on {}", config.bind_address);

    axum::serve(listener, app())
        .await
        .context("Failed to start server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::app;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_answers_on_both_paths() {
        for uri in ["/health", "/dynamic-pricing/health"] {
            let response = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body["status"], "ok");
        }
    }
}
