//! Application settings loaded from `config.toml`.
//!
//! Every field has a default, so a missing file is not an error; a file that exists
//! but does not parse is.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Live refresh settings
    pub refresh: RefreshConfig,
    /// Dashboard presentation settings
    pub dashboard: DashboardConfig,
}

/// `[refresh]` section
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between polling refreshes
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 10 }
    }
}

impl RefreshConfig {
    /// Polling interval as a [`Duration`]. Zero is bumped to one second.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

/// `[dashboard]` section
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of rows in the "recent transactions" list
    pub recent_limit: u64,
    /// Symbol prefixed to formatted amounts
    pub currency_symbol: String,
    /// Insert the sample transactions for users who have none
    pub seed_sample_data: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: 5,
            currency_symbol: "₹".to_string(),
            seed_sample_data: true,
        }
    }
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns `Error::Config` if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Config file {:?} not found, using defaults", path);
        return Ok(AppConfig::default());
    }

    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    parse_config(&contents)
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `BUDGET_PULSE_CONFIG`, or `./config.toml` when unset.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("BUDGET_PULSE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_config(path)
}
