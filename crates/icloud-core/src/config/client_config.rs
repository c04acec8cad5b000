//! Top-level client configuration with file + environment resolution.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{
    ContactsConfig, DeviceConfig, EndpointConfig, PollFailurePolicy, SessionConfig,
    TransportConfig,
};
use crate::errors::ConfigError;
use crate::models::SortOrder;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`ICLOUD_*`)
/// 2. Config file passed to [`ClientConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoints: EndpointConfig,
    pub session: SessionConfig,
    pub devices: DeviceConfig,
    pub contacts: ContactsConfig,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Load a TOML config file, apply `ICLOUD_*` environment overrides, and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let mut config: ClientConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string. No env overrides, no validation.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.keep_alive_interval_ms == 0 {
            return Err(invalid("session.keep_alive_interval_ms", "must be greater than 0"));
        }
        if self.devices.poll_interval_ms == 0 {
            return Err(invalid("devices.poll_interval_ms", "must be greater than 0"));
        }
        if self.contacts.locale.trim().is_empty() {
            return Err(invalid("contacts.locale", "must not be empty"));
        }
        if self.transport.timeout_secs == 0 {
            return Err(invalid("transport.timeout_secs", "must be greater than 0"));
        }
        if let PollFailurePolicy::Retry {
            initial_backoff_ms,
            max_backoff_ms,
            max_attempts,
        } = self.devices.failure_policy
        {
            if max_attempts == 0 {
                return Err(invalid(
                    "devices.failure_policy.max_attempts",
                    "must be greater than 0",
                ));
            }
            if max_backoff_ms < initial_backoff_ms {
                return Err(invalid(
                    "devices.failure_policy.max_backoff_ms",
                    "must not be smaller than initial_backoff_ms",
                ));
            }
        }
        Ok(())
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_millis(self.session.keep_alive_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.devices.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.transport.timeout_secs)
    }

    /// Apply `ICLOUD_*` environment variable overrides.
    /// Unparseable values are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ICLOUD_KEEP_ALIVE_INTERVAL_MS") {
            if let Ok(v) = val.parse::<u64>() {
                self.session.keep_alive_interval_ms = v;
            }
        }
        if let Ok(val) = std::env::var("ICLOUD_POLL_INTERVAL_MS") {
            if let Ok(v) = val.parse::<u64>() {
                self.devices.poll_interval_ms = v;
            }
        }
        if let Ok(val) = std::env::var("ICLOUD_LOCALE") {
            self.contacts.locale = val;
        }
        if let Ok(val) = std::env::var("ICLOUD_SORT_ORDER") {
            if let Ok(order) = val.parse::<SortOrder>() {
                self.contacts.sort_order = order;
            }
        }
        if let Ok(val) = std::env::var("ICLOUD_TIMEOUT_SECS") {
            if let Ok(v) = val.parse::<u64>() {
                self.transport.timeout_secs = v;
            }
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
