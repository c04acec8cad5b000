//! Find My ("fmipservice") request and response types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::serde_helpers::{null_default, string_from_str_or_num};
use crate::config::ClientContextConfig;
use crate::constants::{FIND_MY_STATUS_OK, SERVER_CONTEXT_ID};

/// Client-identifying metadata sent with every tracking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub api_version: String,
    pub app_name: String,
    pub app_version: String,
    pub inactive_time: u64,
    pub timezone: String,
    pub web_stats: String,
}

impl From<&ClientContextConfig> for ClientContext {
    fn from(config: &ClientContextConfig) -> Self {
        Self {
            api_version: config.api_version.clone(),
            app_name: config.app_name.clone(),
            app_version: config.app_version.clone(),
            inactive_time: config.inactive_time,
            timezone: config.timezone.clone(),
            web_stats: config.web_stats.clone(),
        }
    }
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::from(&ClientContextConfig::default())
    }
}

/// Opaque server state echoed back on the next tracking request.
///
/// A handful of fields are typed for inspection; everything else is kept in
/// `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContext {
    #[serde(rename = "server_ctx", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prs_id: Option<i64>,
    #[serde(
        rename = "callbackIntervalInMS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub callback_interval_in_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_lifespan: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<ServerTimeZone>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerContext {
    /// Overwrite the identifier field the way the web client does before echoing.
    pub fn stamp(&mut self) {
        self.id = Some(SERVER_CONTEXT_ID.to_string());
    }

    /// Poll cadence suggested by the server.
    pub fn callback_interval(&self) -> Option<Duration> {
        self.callback_interval_in_ms
            .filter(|ms| *ms > 0)
            .map(|ms| Duration::from_millis(ms as u64))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeZone {
    #[serde(rename = "tzCurrentName", default, skip_serializing_if = "Option::is_none")]
    pub current_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_transition: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_offset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_offset: Option<i64>,
    #[serde(rename = "tzName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of the init, refresh, and play-sound requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMyRequest<'a> {
    pub client_context: &'a ClientContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_context: Option<&'a ServerContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<&'a str>,
}

impl<'a> FindMyRequest<'a> {
    pub fn new(
        client_context: &'a ClientContext,
        server_context: Option<&'a ServerContext>,
    ) -> Self {
        Self {
            client_context,
            server_context,
            device: None,
            subject: None,
        }
    }

    pub fn alert(mut self, device_id: &'a str, subject: &'a str) -> Self {
        self.device = Some(device_id);
        self.subject = Some(subject);
        self
    }
}

/// Response of every Find My endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FindMyResponse {
    /// `"200"` on success.
    #[serde(deserialize_with = "string_from_str_or_num")]
    pub status_code: String,
    #[serde(rename = "content")]
    pub devices: Option<Vec<Device>>,
    pub user_info: Option<UserInfo>,
    pub user_preferences: Option<UserPreferences>,
    pub server_context: Option<ServerContext>,
}

impl FindMyResponse {
    pub fn is_success(&self) -> bool {
        self.status_code == FIND_MY_STATUS_OK
    }
}

/// Snapshot of one registered device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    pub name: Option<String>,
    pub device_display_name: Option<String>,
    pub device_model: Option<String>,
    pub raw_device_model: Option<String>,
    pub model_display_name: Option<String>,
    /// e.g. `iPhone`, `MacBookPro`.
    pub device_class: Option<String>,
    pub device_color: Option<String>,
    /// Charge level in `0.0..=1.0`.
    pub battery_level: Option<f64>,
    pub battery_status: Option<String>,
    pub device_status: Option<String>,
    pub location: Option<DeviceLocation>,
    pub location_enabled: Option<bool>,
    pub location_capable: Option<bool>,
    pub is_locating: Option<bool>,
    pub is_mac: Option<bool>,
    pub this_device: Option<bool>,
    pub lost_mode_capable: Option<bool>,
    pub lost_mode_enabled: Option<bool>,
    pub activation_locked: Option<bool>,
    pub wipe_in_progress: Option<bool>,
    pub max_msg_char: Option<u64>,
    pub passcode_length: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    /// Best human-readable label.
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.device_display_name.as_deref())
            .unwrap_or(&self.id)
    }

    pub fn is_class(&self, class: &str) -> bool {
        self.device_class.as_deref() == Some(class)
    }

    /// Battery level as a percentage.
    pub fn battery_percent(&self) -> Option<f64> {
        self.battery_level.map(|level| (level * 100.0).clamp(0.0, 100.0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceLocation {
    /// Milliseconds since the Unix epoch.
    pub time_stamp: Option<i64>,
    pub location_type: Option<Value>,
    pub position_type: Option<Value>,
    pub horizontal_accuracy: Option<f64>,
    pub location_finished: Option<bool>,
    pub is_inaccurate: Option<bool>,
    pub is_old: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl DeviceLocation {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.time_stamp.and_then(DateTime::from_timestamp_millis)
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub activation_upgrade_email_sent: Option<bool>,
    pub web_prefs: Option<WebPrefs>,
    pub last_updated_time: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebPrefs {
    pub id: Option<String>,
    pub selected_device_id: Option<String>,
}
