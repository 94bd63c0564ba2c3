// ============================================================================
// API Gateway
// ============================================================================
//
// Single entry point for all client requests. Resolves a backend service by
// path prefix and proxies the request, relaying the upstream's JSON body and
// status code verbatim.
//
// Architecture:
// - Stateless (scales horizontally)
// - Static route table, read-only after startup
// - No retry, no backoff, no circuit breaking: failures surface immediately
//
// ============================================================================

pub mod discovery;
pub mod proxy;
pub mod router;
pub mod routes;

pub use discovery::{ServiceDiscovery, StaticServiceDiscovery};
pub use proxy::ServiceClient;
pub use router::{app, GatewayState};
