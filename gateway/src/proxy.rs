// ============================================================================
// Service Client
// ============================================================================
//
// HTTP client for forwarding requests to backend services. One outbound call
// per inbound request, no retry, no backoff: transport failures surface
// immediately as a 503 envelope.
//
// ============================================================================

use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use storefront_error::{AppError, AppResult};

// Hop-by-hop / recomputed headers that must not be copied to the upstream
const SKIPPED_HEADERS: &[&str] = &["host", "content-length", "content-type"];

/// HTTP client for forwarding requests to backend services
pub struct ServiceClient {
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new(timeout_secs: u64) -> Self {
        // Connection pooling and keep-alive shared across all upstreams
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Forward a request to `target_url` and relay the upstream's JSON body
    /// and exact status code.
    ///
    /// The query string is only sent on GET and the JSON body only on
    /// POST/PUT; DELETE goes out bare. Transport failures map to
    /// `ServiceUnavailable` carrying the failure reason.
    pub async fn forward(
        &self,
        method: Method,
        target_url: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        json_body: Option<&Value>,
    ) -> AppResult<(StatusCode, Value)> {
        let url = match query {
            Some(q) if !q.is_empty() => format!("{}?{}", target_url, q),
            _ => target_url.to_string(),
        };

        let mut request = self.client.request(method, &url);

        for (key, value) in headers.iter() {
            if !SKIPPED_HEADERS.contains(&key.as_str()) {
                request = request.header(key, value);
            }
        }

        if let Some(body) = json_body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response.json::<Value>().await.map_err(|e| {
            AppError::ServiceUnavailable(format!("invalid JSON response from upstream: {}", e))
        })?;

        Ok((status, body))
    }
}
