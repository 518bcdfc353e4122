//! Dramex Rate Server Binary
//!
//! Serves exchange rates for the listing directory over HTTP.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dramex_server::{routes, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting Dramex rate server");

    // Load configuration
    let config = ServerConfig::from_env();
    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let addr = format!("{}:{}", config.listen_addr, config.listen_port);
    let state = AppState::new(config);
    let app = routes::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        listen_addr = %addr,
        production = state.config.production,
        upstream_url = %state.config.upstream_url,
        "Rate server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Rate server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");
    info!("Shutdown signal received");
}
