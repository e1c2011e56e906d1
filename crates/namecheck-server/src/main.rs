//! HTTP server entry point.
//!
//! Loads configuration, builds the shared provider client, and serves
//! `POST /predict` until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use namecheck_config::ServerConfig;
use namecheck_llm::LlmClient;
use namecheck_server::{build_router, ServerState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env().context("failed to load server configuration")?;
    info!("Loaded configuration: {:?}", config);

    let client = LlmClient::from_config(&config);
    let state = Arc::new(ServerState::new(Arc::new(client), config.precheck));
    let app = build_router(state);

    info!("Starting server on {}", config.bind_addr);
    if config.precheck {
        info!("Local pre-check enabled");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
