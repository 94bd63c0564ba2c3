// ============================================================================
// Visual Search Service
// ============================================================================
//
// Mock "AI" visual product search. The gateway forwards requests with the
// /visual-search prefix intact.
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
use storefront_error::{AppError, AppResult};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/visual-search/health", get(health))
        .route("/visual-search/search-by-image", post(search_by_image))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "service": "AI Visual Search Service"}))
}

async fn search_by_image(body: Option<Json<Value>>) -> AppResult<Json<Value>> {
    let body = body.map(|Json(v)| v).unwrap_or_else(|| json!({}));

    let has_image = body.get("image").and_then(Value::as_str).is_some()
        || body.get("image_url").and_then(Value::as_str).is_some();
    if !has_image {
        return Err(AppError::validation("No image provided"));
    }

    let limit = body
        .get("limit")
        .and_then(Value::as_u64)
        .unwrap_or(6) as usize;

    let analysis = engine::analyze_image();
    let matches = engine::find_matches(&analysis, limit);

    Ok(Json(json!({
        "status": "success",
        "image_analysis": analysis.to_json(),
        "matches": matches,
        "algorithm": "Deep Learning Visual Recognition",
        "confidence_threshold": 0.7,
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

    info!("=== Visual Search Service Starting ===");
    info!("Port: {}", config.port);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Visual Search Service listening on {}", config.bind_address);

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
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/visual-search/search-by-image")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_image_is_400() {
        let (status, body) = read_json(app().oneshot(post(json!({}))).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No image provided");
    }

    #[tokio::test]
    async fn image_url_yields_analysis_and_matches() {
        let (status, body) = read_json(
            app()
                .oneshot(post(json!({"image_url": "https://example.com/photo.jpg"})))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["algorithm"], "Deep Learning Visual Recognition");
        assert_eq!(body["confidence_threshold"], 0.7);
        assert!(body["image_analysis"]["dominant_colors"].is_array());
        assert!(body["matches"].is_array());
    }

    #[tokio::test]
    async fn base64_image_is_accepted() {
        let (status, _) = read_json(
            app()
                .oneshot(post(json!({"image": "aGVsbG8=", "limit": 2})))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
