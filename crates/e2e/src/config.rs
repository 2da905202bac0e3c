//! Polling configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{PollError, PollResult};

/// Environment variable overriding [`PollConfig::default_wait_seconds`]
pub const RELOAD_WAIT_ENV: &str = "PUBLISHING_E2E_RELOAD_WAIT_SECONDS";

/// Environment variable overriding [`PollConfig::interval_seconds`]
pub const INTERVAL_ENV: &str = "PUBLISHING_E2E_INTERVAL_SECONDS";

/// Process-wide polling defaults, injected into a [`Poller`](crate::Poller)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Wait budget used when a caller does not pass an explicit timeout
    pub default_wait_seconds: f64,

    /// Sleep between attempts when a caller does not pass an interval
    pub interval_seconds: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            default_wait_seconds: 60.0,
            interval_seconds: 0.5,
        }
    }
}

impl PollConfig {
    /// Load configuration from a TOML file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> PollResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> PollResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> PollResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(RELOAD_WAIT_ENV) {
            self.default_wait_seconds = parse_seconds(RELOAD_WAIT_ENV, &value)?;
        }
        if let Some(value) = lookup(INTERVAL_ENV) {
            self.interval_seconds = parse_seconds(INTERVAL_ENV, &value)?;
        }
        Ok(self)
    }

    pub fn default_wait(&self) -> PollResult<Duration> {
        to_duration("default_wait_seconds", self.default_wait_seconds)
    }

    pub fn interval(&self) -> PollResult<Duration> {
        let interval = to_duration("interval_seconds", self.interval_seconds)?;
        if interval.is_zero() {
            return Err(PollError::InvalidConfig(
                "interval_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(interval)
    }
}

fn parse_seconds(key: &str, value: &str) -> PollResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| PollError::InvalidConfig(format!("{}={:?}: {}", key, value, e)))
}

fn to_duration(field: &str, seconds: f64) -> PollResult<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| PollError::InvalidConfig(format!("{} must be a non-negative number, got {}", field, seconds)))
}
