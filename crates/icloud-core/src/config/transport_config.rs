use serde::{Deserialize, Serialize};

use super::defaults;

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-request timeout. The core imposes no deadline of its own.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
            user_agent: defaults::DEFAULT_USER_AGENT.to_string(),
        }
    }
}
