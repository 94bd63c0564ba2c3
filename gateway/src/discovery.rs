// ============================================================================
// Service Discovery
// ============================================================================
//
// Resolves a route table entry to an upstream base URL. Static only: URLs
// come from configuration at startup and never change afterwards.
//
// ============================================================================

use crate::routes::Route;
use storefront_config::UpstreamsConfig;
use storefront_error::{AppError, AppResult};

/// Service discovery abstraction
pub trait ServiceDiscovery: Send + Sync {
    /// Get the upstream base URL for a route, or an error naming the missing
    /// configuration variable
    fn upstream_url(&self, route: &Route) -> AppResult<String>;
}

/// Static service discovery (from config)
pub struct StaticServiceDiscovery {
    upstreams: UpstreamsConfig,
}

impl StaticServiceDiscovery {
    pub fn new(upstreams: UpstreamsConfig) -> Self {
        Self { upstreams }
    }
}

impl ServiceDiscovery for StaticServiceDiscovery {
    fn upstream_url(&self, route: &Route) -> AppResult<String> {
        let url = match route.env_var {
            "PRODUCT_SERVICE_URL" => &self.upstreams.product_service_url,
            "AUTH_SERVICE_URL" => &self.upstreams.auth_service_url,
            "CART_SERVICE_URL" => &self.upstreams.cart_service_url,
            "ORDER_SERVICE_URL" => &self.upstreams.order_service_url,
            "PAYMENT_SERVICE_URL" => &self.upstreams.payment_service_url,
            "RECOMMENDATION_SERVICE_URL" => &self.upstreams.recommendation_service_url,
            "VISUAL_SEARCH_SERVICE_URL" => &self.upstreams.visual_search_service_url,
            "FRAUD_DETECTION_SERVICE_URL" => &self.upstreams.fraud_detection_service_url,
            "VOICE_ASSISTANT_SERVICE_URL" => &self.upstreams.voice_assistant_service_url,
            "DYNAMIC_PRICING_SERVICE_URL" => &self.upstreams.dynamic_pricing_service_url,
            other => return Err(AppError::internal(format!("Unknown route entry: {}", other))),
        };

        url.clone()
            .map(|u| u.trim_end_matches('/').to_string())
            .ok_or_else(|| AppError::RouteNotConfigured(route.env_var.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::ROUTES;

    #[test]
    fn unconfigured_route_names_the_env_var() {
        let discovery = StaticServiceDiscovery::new(UpstreamsConfig::default());
        let route = &ROUTES[0];

        let err = discovery.upstream_url(route).unwrap_err();
        assert!(matches!(err, AppError::RouteNotConfigured(ref v) if v == "PRODUCT_SERVICE_URL"));
    }

    #[test]
    fn configured_route_resolves_and_trims_trailing_slash() {
        let upstreams = UpstreamsConfig {
            cart_service_url: Some("http://localhost:8003/".to_string()),
            ..Default::default()
        };
        let discovery = StaticServiceDiscovery::new(upstreams);
        let route = ROUTES.iter().find(|r| r.prefix == "cart").unwrap();

        assert_eq!(
            discovery.upstream_url(route).unwrap(),
            "http://localhost:8003"
        );
    }

    #[test]
    fn every_route_entry_is_resolvable() {
        let upstreams = UpstreamsConfig {
            product_service_url: Some("http://p".into()),
            auth_service_url: Some("http://a".into()),
            cart_service_url: Some("http://c".into()),
            order_service_url: Some("http://o".into()),
            payment_service_url: Some("http://pay".into()),
            recommendation_service_url: Some("http://r".into()),
            visual_search_service_url: Some("http://v".into()),
            fraud_detection_service_url: Some("http://f".into()),
            voice_assistant_service_url: Some("http://va".into()),
            dynamic_pricing_service_url: Some("http://d".into()),
        };
        let discovery = StaticServiceDiscovery::new(upstreams);

        for route in ROUTES {
            assert!(discovery.upstream_url(route).is_ok(), "{}", route.env_var);
        }
    }
}
