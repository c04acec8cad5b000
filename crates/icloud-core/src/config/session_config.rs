use serde::{Deserialize, Serialize};

use super::defaults;

/// Fixed service entry points. Overridable so the client can be pointed at a
/// recording proxy or a local stand-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Credentials are POSTed here.
    pub login_url: String,
    /// Sent as `Origin` on every request and as `Referer` outside Find My.
    pub home_url: String,
    /// `Referer` for the Find My endpoints.
    pub find_referer_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            login_url: defaults::DEFAULT_LOGIN_URL.to_string(),
            home_url: defaults::DEFAULT_HOME_URL.to_string(),
            find_referer_url: defaults::DEFAULT_FIND_REFERER_URL.to_string(),
        }
    }
}

/// Session liveness settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between session refreshes. The first refresh happens one full
    /// interval after connecting.
    pub keep_alive_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keep_alive_interval_ms: defaults::DEFAULT_KEEP_ALIVE_INTERVAL_MS,
        }
    }
}
