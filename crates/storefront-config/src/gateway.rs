// ============================================================================
// Gateway Configuration
// ============================================================================

const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

/// Upstream base URLs for the gateway's route table, one env var per backend.
///
/// Unset variables stay `None` so the gateway can answer with an error naming
/// the missing variable instead of silently routing to a default.
#[derive(Clone, Debug, Default)]
pub struct UpstreamsConfig {
    pub product_service_url: Option<String>,
    pub auth_service_url: Option<String>,
    pub cart_service_url: Option<String>,
    pub order_service_url: Option<String>,
    pub payment_service_url: Option<String>,
    pub recommendation_service_url: Option<String>,
    pub visual_search_service_url: Option<String>,
    pub fraud_detection_service_url: Option<String>,
    pub voice_assistant_service_url: Option<String>,
    pub dynamic_pricing_service_url: Option<String>,
}

impl UpstreamsConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            product_service_url: std::env::var("PRODUCT_SERVICE_URL").ok(),
            auth_service_url: std::env::var("AUTH_SERVICE_URL").ok(),
            cart_service_url: std::env::var("CART_SERVICE_URL").ok(),
            order_service_url: std::env::var("ORDER_SERVICE_URL").ok(),
            payment_service_url: std::env::var("PAYMENT_SERVICE_URL").ok(),
            recommendation_service_url: std::env::var("RECOMMENDATION_SERVICE_URL").ok(),
            visual_search_service_url: std::env::var("VISUAL_SEARCH_SERVICE_URL").ok(),
            fraud_detection_service_url: std::env::var("FRAUD_DETECTION_SERVICE_URL").ok(),
            voice_assistant_service_url: std::env::var("VOICE_ASSISTANT_SERVICE_URL").ok(),
            dynamic_pricing_service_url: std::env::var("DYNAMIC_PRICING_SERVICE_URL").ok(),
        }
    }
}

/// Gateway configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Timeout for upstream requests in seconds (default: 30)
    pub timeout_secs: u64,
    /// Route table upstream URLs
    pub upstreams: UpstreamsConfig,
}

impl GatewayConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
            upstreams: UpstreamsConfig::from_env(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_GATEWAY_TIMEOUT_SECS,
            upstreams: UpstreamsConfig::default(),
        }
    }
}
