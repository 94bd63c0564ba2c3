// ============================================================================
// Product Service
// ============================================================================
//
// Catalog service for the Storefront platform. The gateway strips the
// /products prefix, so routes here live at the root:
// - GET  /            list (category/search/min_price/max_price filters)
// - POST /            create
// - GET  /categories  distinct category list
// - GET  /search      text search with sorting
// - CRUD on /{id}
//
// Storage is in-memory and single-instance (demo platform semantics).
//
// ============================================================================

mod handlers;
mod store;

use anyhow::{Context, Result};
use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use storefront_config::Config;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn app() -> Router {
    let state = Arc::new(handlers::AppState {
        store: store::ProductStore::default(),
    });

    Router::new()
        .route("/health", get(health))
        .route("/", get(handlers::list).post(handlers::create))
        .route("/categories", get(handlers::categories))
        .route("/search", get(handlers::search))
        .route(
            "/{id}",
            get(handlers::get)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy", "service": "product-service"}))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Product Service Starting ===");
    info!("Port: {}", config.port);

    let app = app();

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .context("Failed to bind to address")?;

    info!("Product Service listening on {}", config.bind_address);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
