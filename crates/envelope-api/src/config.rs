//! Configuration loading and validation for the API service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use envelope::MasterKey;
use serde::Deserialize;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Standard-base64 256-bit master key. When absent or blank the service
    /// still starts, but every create/read request fails with 503.
    #[serde(default)]
    pub master_key: Option<String>,

    /// SQLite database file. When absent, records live in memory only.
    #[serde(default)]
    pub database_path: Option<String>,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Decode the configured master key, if one is set.
    ///
    /// # Errors
    ///
    /// Returns an error if `MASTER_KEY` is set but is not base64 for exactly
    /// 32 bytes.
    pub fn master_key(&self) -> Result<Option<MasterKey>> {
        match self.master_key.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(encoded) => MasterKey::from_base64(encoded)
                .map(Some)
                .context("MASTER_KEY must be standard base64 encoding exactly 32 bytes"),
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        self.master_key()?;
        if let Some(path) = &self.database_path {
            if path.trim().is_empty() {
                anyhow::bail!("DATABASE_PATH must not be empty when set");
            }
        }
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("master_key", &self.master_key.as_ref().map(|_| "[REDACTED]"))
            .field("database_path", &self.database_path)
            .field("listen_port", &self.listen_port)
            .field("log_level", &self.log_level)
            .finish()
    }
}
