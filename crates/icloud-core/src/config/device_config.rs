use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Find My tracking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Sleep between polls when the loop is started without an explicit interval.
    pub poll_interval_ms: u64,
    /// Run one poll right after connecting.
    pub poll_on_connect: bool,
    pub client_context: ClientContextConfig,
    pub failure_policy: PollFailurePolicy,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: defaults::DEFAULT_POLL_INTERVAL_MS,
            poll_on_connect: defaults::DEFAULT_POLL_ON_CONNECT,
            client_context: ClientContextConfig::default(),
            failure_policy: PollFailurePolicy::default(),
        }
    }
}

/// Values for the client context sent with every tracking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientContextConfig {
    pub api_version: String,
    pub app_name: String,
    pub app_version: String,
    pub inactive_time: u64,
    pub timezone: String,
    pub web_stats: String,
}

impl Default for ClientContextConfig {
    fn default() -> Self {
        Self {
            api_version: defaults::DEFAULT_API_VERSION.to_string(),
            app_name: defaults::DEFAULT_APP_NAME.to_string(),
            app_version: defaults::DEFAULT_APP_VERSION.to_string(),
            inactive_time: defaults::DEFAULT_INACTIVE_TIME,
            timezone: defaults::DEFAULT_TIMEZONE.to_string(),
            web_stats: defaults::DEFAULT_WEB_STATS.to_string(),
        }
    }
}

/// What the polling loop does when a poll returns an error.
///
/// `NotConnected` always ends the loop regardless of the policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PollFailurePolicy {
    /// Stop the loop on the first failure.
    #[default]
    Terminate,
    /// Back off exponentially and keep polling, up to `max_attempts`
    /// consecutive failures.
    Retry {
        #[serde(default = "default_initial_backoff_ms")]
        initial_backoff_ms: u64,
        #[serde(default = "default_max_backoff_ms")]
        max_backoff_ms: u64,
        #[serde(default = "default_max_attempts")]
        max_attempts: u32,
    },
    /// Stop the loop and tear the whole session down.
    Escalate,
}

impl PollFailurePolicy {
    /// Retry policy with the default backoff bounds.
    pub fn retry() -> Self {
        Self::Retry {
            initial_backoff_ms: defaults::DEFAULT_RETRY_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_RETRY_MAX_BACKOFF_MS,
            max_attempts: defaults::DEFAULT_RETRY_MAX_ATTEMPTS,
        }
    }

    /// Delay before the retry that follows `previous`, doubling up to the cap.
    /// Returns the initial backoff when `previous` is `None`.
    pub fn next_backoff(&self, previous: Option<Duration>) -> Option<Duration> {
        match self {
            Self::Retry {
                initial_backoff_ms,
                max_backoff_ms,
                ..
            } => {
                let max = Duration::from_millis(*max_backoff_ms);
                Some(match previous {
                    None => Duration::from_millis(*initial_backoff_ms).min(max),
                    Some(prev) => (prev * 2).min(max),
                })
            }
            _ => None,
        }
    }
}

fn default_initial_backoff_ms() -> u64 {
    defaults::DEFAULT_RETRY_INITIAL_BACKOFF_MS
}

fn default_max_backoff_ms() -> u64 {
    defaults::DEFAULT_RETRY_MAX_BACKOFF_MS
}

fn default_max_attempts() -> u32 {
    defaults::DEFAULT_RETRY_MAX_ATTEMPTS
}
