//! Storefront proxy server
//!
//! Serves `/api/commerce/*`, forwarding each call to the external commerce
//! backend and reshaping listing and store payloads for the storefront.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront_server::{
    app_state::AppState, config::ServerConfig, proxy::BackendProxy, routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!(backend = config.backend.api_base(), "commerce backend configured");

    let state = AppState::new(BackendProxy::new(config.backend.clone()));
    let app = routes::app(state, &config.cors_allowed_origins);

    let addr = config.listen_addr();
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
