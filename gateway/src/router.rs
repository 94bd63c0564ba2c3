// ============================================================================
// Gateway Router
// ============================================================================
//
// Single entry point for all client requests. Matches the inbound path
// against the static route table, forwards the request to the resolved
// upstream, and relays the upstream's JSON response and status code.
//
// Gateway-level failures are answered locally:
// - unknown prefix                      -> 404
// - method not mapped for the route     -> 405
// - upstream URL not configured         -> 500 (names the env var)
// - upstream unreachable                -> 503 (names the failure)
//
// ============================================================================

use crate::discovery::{ServiceDiscovery, StaticServiceDiscovery};
use crate::proxy::ServiceClient;
use crate::routes::{match_route, method_allowed};
use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use storefront_config::GatewayConfig;
use storefront_error::{AppError, AppResult};
use tower_http::trace::TraceLayer;

/// Gateway router state
pub struct GatewayState {
    pub discovery: Box<dyn ServiceDiscovery>,
    pub client: ServiceClient,
}

/// Build the gateway application router
pub fn app(config: &GatewayConfig) -> Router {
    let state = Arc::new(GatewayState {
        discovery: Box::new(StaticServiceDiscovery::new(config.upstreams.clone())),
        client: ServiceClient::new(config.timeout_secs),
    });

    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/{*path}", any(route_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "healthy", "service": "api-gateway"}))
}

async fn index() -> impl IntoResponse {
    Json(json!({"message": "API Gateway is running", "service": "api-gateway"}))
}

/// Route a request to the appropriate backend service
pub async fn route_request(
    State(state): State<Arc<GatewayState>>,
    request: Request<Body>,
) -> AppResult<Response> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let headers = request.headers().clone();

    let matched = match_route(&path)
        .ok_or_else(|| AppError::not_found(format!("No route for {}", path)))?;

    if !method_allowed(&method, matched.is_base) {
        return Err(AppError::MethodNotAllowed);
    }

    let base_url = state.discovery.upstream_url(matched.route)?;
    let target_url = format!("{}{}", base_url, matched.upstream_path);

    // Query is only forwarded on GET, bodies only on POST/PUT
    let json_body: Option<Value> = if matches!(method, Method::POST | Method::PUT) {
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .map_err(|e| AppError::internal(format!("Failed to read request body: {}", e)))?;
        if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes)?)
        }
    } else {
        None
    };
    let query = if method == Method::GET {
        query.as_deref()
    } else {
        None
    };

    tracing::debug!(
        method = %method,
        service = matched.route.prefix,
        target = %target_url,
        "Forwarding request"
    );

    let (status, body) = state
        .client
        .forward(method, &target_url, query, &headers, json_body.as_ref())
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                service = matched.route.prefix,
                target = %target_url,
                "Failed to forward request to service"
            );
            e
        })?;

    Ok((status, Json(body)).into_response())
}
