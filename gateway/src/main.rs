// ============================================================================
// API Gateway Service
// ============================================================================

use anyhow::{Context, Result};
use std::net::SocketAddr;
use storefront_config::Config;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.rust_log.clone()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== API Gateway Starting ===");
    info!("Port: {}", config.port);
    info!("Upstream timeout: {}s", config.gateway.timeout_secs);

    for route in gateway::routes::ROUTES {
        if std::env::var(route.env_var).is_err() {
            warn!(
                prefix = route.prefix,
                env_var = route.env_var,
                "No upstream configured; requests to this prefix will fail"
            );
        }
    }

    let app = gateway::app(&config.gateway);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    info!("API Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
