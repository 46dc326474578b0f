//! # DPoS Ledger Node
//!
//! Entry point: telemetry, configuration, genesis, then the HTTP server.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use ledger_node::{build_state, router, NodeConfig};
use ledger_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = NodeConfig::from_env().context("Invalid node configuration")?;
    info!(
        http_port = config.http_port,
        committee_size = config.ledger.committee_size,
        policy = ?config.ledger.proposer_policy,
        election = ?config.election,
        "Configuration loaded"
    );

    let state = build_state(&config)?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP server listening. Press Ctrl+C to stop.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Node stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
