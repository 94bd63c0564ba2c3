// ============================================================================
// Route Table
// ============================================================================
//
// Static mapping from path prefix to upstream service. Entries are fixed for
// the process lifetime; URLs come from one environment variable per backend.
//
// URL construction rules (matching the platform's historical gateway):
// - /products strips its prefix: /products/abc -> /abc, /products -> /
// - every other prefix is retained: /cart/add -> /cart/add, /cart -> /cart/
// - /auth has no bare-prefix form; a suffix is required
//
// ============================================================================

use axum::http::Method;

/// One route table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Leading path segment, without slashes (e.g. "products")
    pub prefix: &'static str,
    /// Environment variable that supplies the upstream base URL
    pub env_var: &'static str,
    /// Whether the prefix is removed from the forwarded path
    pub strip_prefix: bool,
    /// Whether the bare prefix (no suffix) is routable
    pub has_base_route: bool,
}

/// The platform's route table
pub const ROUTES: &[Route] = &[
    Route { prefix: "products", env_var: "PRODUCT_SERVICE_URL", strip_prefix: true, has_base_route: true },
    Route { prefix: "auth", env_var: "AUTH_SERVICE_URL", strip_prefix: false, has_base_route: false },
    Route { prefix: "cart", env_var: "CART_SERVICE_URL", strip_prefix: false, has_base_route: true },
    Route { prefix: "orders", env_var: "ORDER_SERVICE_URL", strip_prefix: false, has_base_route: true },
    Route { prefix: "payments", env_var: "PAYMENT_SERVICE_URL", strip_prefix: false, has_base_route: true },
    Route { prefix: "recommendations", env_var: "RECOMMENDATION_SERVICE_URL", strip_prefix: false, has_base_route: true },
    Route { prefix: "visual-search", env_var: "VISUAL_SEARCH_SERVICE_URL", strip_prefix: false, has_base_route: true },
    Route { prefix: "fraud-detection", env_var: "FRAUD_DETECTION_SERVICE_URL", strip_prefix: false, has_base_route: true },
    Route { prefix: "voice-assistant", env_var: "VOICE_ASSISTANT_SERVICE_URL", strip_prefix: false, has_base_route: true },
    Route { prefix: "dynamic-pricing", env_var: "DYNAMIC_PRICING_SERVICE_URL", strip_prefix: false, has_base_route: true },
];

/// A matched route plus the path to request on the upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    /// Path on the upstream, always starting with '/'
    pub upstream_path: String,
    /// True when the inbound path was the bare prefix
    pub is_base: bool,
}

/// Match an inbound request path against the route table.
///
/// Returns `None` for unknown prefixes and for bare prefixes that have no
/// base route (e.g. `/auth`).
pub fn match_route(path: &str) -> Option<RouteMatch> {
    let trimmed = path.strip_prefix('/')?;
    let (first, rest) = match trimmed.split_once('/') {
        Some((first, rest)) => (first, rest),
        None => (trimmed, ""),
    };

    let route = ROUTES.iter().find(|r| r.prefix == first)?;
    let is_base = rest.is_empty();

    if is_base && !route.has_base_route {
        return None;
    }

    let upstream_path = if route.strip_prefix {
        format!("/{}", rest)
    } else {
        format!("/{}/{}", route.prefix, rest)
    };

    Some(RouteMatch {
        route,
        upstream_path,
        is_base,
    })
}

/// Whether a method is accepted for the matched route form.
///
/// Bare prefixes accept only GET and POST; suffixed paths accept the full
/// GET/POST/PUT/DELETE set. Everything else is 405.
pub fn method_allowed(method: &Method, is_base: bool) -> bool {
    if is_base {
        matches!(*method, Method::GET | Method::POST)
    } else {
        matches!(
            *method,
            Method::GET | Method::POST | Method::PUT | Method::DELETE
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn products_prefix_is_stripped() {
        let m = match_route("/products/abc-123").unwrap();
        assert_eq!(m.route.env_var, "PRODUCT_SERVICE_URL");
        assert_eq!(m.upstream_path, "/abc-123");
        assert!(!m.is_base);

        let m = match_route("/products").unwrap();
        assert_eq!(m.upstream_path, "/");
        assert!(m.is_base);
    }

    #[test]
    fn other_prefixes_are_retained() {
        let m = match_route("/cart/add").unwrap();
        assert_eq!(m.upstream_path, "/cart/add");

        let m = match_route("/orders").unwrap();
        assert_eq!(m.upstream_path, "/orders/");
        assert!(m.is_base);

        let m = match_route("/fraud-detection/analyze-transaction").unwrap();
        assert_eq!(m.route.env_var, "FRAUD_DETECTION_SERVICE_URL");
        assert_eq!(m.upstream_path, "/fraud-detection/analyze-transaction");
    }

    #[test]
    fn auth_requires_a_suffix() {
        assert!(match_route("/auth").is_none());
        let m = match_route("/auth/login").unwrap();
        assert_eq!(m.upstream_path, "/auth/login");
    }

    #[test]
    fn unknown_prefix_does_not_match() {
        assert!(match_route("/unknown").is_none());
        assert!(match_route("/unknown/thing").is_none());
    }

    #[test]
    fn nested_suffix_is_preserved() {
        let m = match_route("/orders/42/status").unwrap();
        assert_eq!(m.upstream_path, "/orders/42/status");
    }

    #[test]
    fn base_routes_allow_only_get_and_post() {
        assert!(method_allowed(&Method::GET, true));
        assert!(method_allowed(&Method::POST, true));
        assert!(!method_allowed(&Method::PUT, true));
        assert!(!method_allowed(&Method::DELETE, true));
    }

    #[test]
    fn suffix_routes_allow_the_full_set() {
        for m in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            assert!(method_allowed(&m, false));
        }
        assert!(!method_allowed(&Method::PATCH, false));
        assert!(!method_allowed(&Method::HEAD, false));
    }
}
