use std::net::SocketAddr;

use anyhow::Context;
use solar_estimate_bridge::{query_api, IngestCoordinator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("starting solar estimate bridge");

    // Loads reference data and spawns the single ingest worker; dataset
    // problems abort here, before any cycle runs.
    let coordinator = IngestCoordinator::start()?;

    let listen_addr: SocketAddr = std::env::var("HTTP_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
        .parse()
        .context("HTTP_LISTEN must be a socket address like 0.0.0.0:5000")?;

    query_api::serve(listen_addr, coordinator.snapshot_store()).await
}
