//! Backend Configuration
//!
//! Where the remote store lives and how prices are displayed. Loaded from
//! a JSON file or the environment; missing values fall back to defaults.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_API_URL: &str = "PRICE_WATCH_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "PRICE_WATCH_TIMEOUT_SECS";
pub const ENV_CURRENCY: &str = "PRICE_WATCH_CURRENCY";

const DEFAULT_BASE_URL: &str = "http://hm.oznepalservices.com.au";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CURRENCY: &str = "$";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the remote store; endpoint paths are joined onto it
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Symbol used when formatting prices for display
    pub currency_symbol: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            currency_symbol: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl BackendConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Defaults overridden by `PRICE_WATCH_*` environment variables
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unparseable values are skipped
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        override_from(&lookup, ENV_API_URL, &mut self.base_url);
        override_from(&lookup, ENV_TIMEOUT_SECS, &mut self.request_timeout_secs);
        override_from(&lookup, ENV_CURRENCY, &mut self.currency_symbol);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn override_from<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T)
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };

    match raw.trim().parse::<T>() {
        Ok(value) => {
            info!("{key} set, using {value}");
            *target = value;
        }
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, keeping {target}");
        }
    }
}
