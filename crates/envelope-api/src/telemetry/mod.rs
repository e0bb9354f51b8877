//! Structured JSON logging for the API service.
//!
//! # Telemetry invariants
//!
//! - **No plaintext or key material** may appear in any log field. Record ids,
//!   byte lengths, and the master key fingerprint are the only crypto-adjacent
//!   values logged.
//! - Log level comes from `LOG_LEVEL` (default: `info`); `RUST_LOG` overrides it.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the global tracing subscriber.
///
/// Outputs structured JSON logs to stdout at the configured log level.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing subscriber: {e}"))
}
