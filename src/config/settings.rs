//! Network settings for the query client

use crate::error::ConfigError;
use crate::network::{generate_user_agent, DEFAULT_USER_AGENT};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default network query timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Environment variable overriding the query timeout
pub const TIMEOUT_ENV: &str = "NETQUERY_TIMEOUT_MS";

/// Environment variable overriding the user agent
pub const USER_AGENT_ENV: &str = "NETQUERY_USER_AGENT";

/// Settings applied to every request issued by a query client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Settings file layout of the owning library, where the network block is nested
#[derive(Debug, Deserialize)]
struct SettingsFile {
    network: NetworkSettings,
}

impl NetworkSettings {
    pub fn new(timeout_ms: u64, user_agent: impl Into<String>) -> Self {
        Self {
            timeout_ms,
            user_agent: user_agent.into(),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replace the user agent with a randomly picked desktop browser string
    pub fn with_random_user_agent(mut self) -> Self {
        self.user_agent = generate_user_agent();
        self
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load settings from a YAML file.
    ///
    /// Accepts either a bare settings document or one with the settings nested
    /// under a `network:` key.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.get("network").is_some() {
            let file: SettingsFile = serde_yaml::from_value(value)?;
            return Ok(file.network);
        }
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }

    /// Merge with environment variables (NETQUERY_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var(TIMEOUT_ENV) {
            match val.trim().parse() {
                Ok(timeout_ms) => self.timeout_ms = timeout_ms,
                Err(_) => warn!("Ignoring {}={:?}: not a number of milliseconds", TIMEOUT_ENV, val),
            }
        }
        if let Ok(val) = std::env::var(USER_AGENT_ENV) {
            if val.trim().is_empty() {
                warn!("Ignoring empty {}", USER_AGENT_ENV);
            } else {
                self.user_agent = val;
            }
        }
    }

    /// Check the settings can be applied to an HTTP client
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.user_agent.trim().is_empty() || HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(ConfigError::InvalidUserAgent(self.user_agent.clone()));
        }
        Ok(())
    }
}
