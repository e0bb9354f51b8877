//! `envelope-api` — HTTP service entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise tracing.
//! 3. Decode the master key, if configured.
//! 4. Open the record store (SQLite or in-memory).
//! 5. Build the Axum router and start serving.

mod config;
mod server;
mod store;
mod telemetry;

use anyhow::{Context, Result};
use tracing::{info, warn};

use config::Config;
use server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        "envelope-api starting"
    );

    // -----------------------------------------------------------------------
    // 3. Master key
    // -----------------------------------------------------------------------
    let master_key = cfg.master_key()?;
    match &master_key {
        Some(key) => {
            let fingerprint = key.fingerprint()?;
            info!(fingerprint = %fingerprint, "master key loaded");
        }
        None => warn!("MASTER_KEY not set; create and read requests will return 503"),
    }

    // -----------------------------------------------------------------------
    // 4. Record store
    // -----------------------------------------------------------------------
    let store =
        store::open(cfg.database_path.as_deref()).context("failed to open record store")?;
    info!(
        backend = store.backend(),
        records = store.count().unwrap_or(0),
        "record store ready"
    );

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(master_key, store);
    let router = server::router::build(state);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router).await?;

    Ok(())
}
