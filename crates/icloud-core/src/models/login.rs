//! Login request and response.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::serde_helpers::{null_default, number_from_str_or_num, opt_number_from_str_or_num};
use crate::constants::ACTIVE_ACCOUNT_STATUS;

/// Credentials POSTed to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub apple_id: String,
    pub password: String,
    pub extended_login: bool,
}

impl LoginCredentials {
    pub fn new(
        apple_id: impl Into<String>,
        password: impl Into<String>,
        extended_login: bool,
    ) -> Self {
        Self {
            apple_id: apple_id.into(),
            password: password.into(),
            extended_login,
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("apple_id", &self.apple_id)
            .field("password", &"<redacted>")
            .field("extended_login", &self.extended_login)
            .finish()
    }
}

/// Parsed login response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponse {
    pub is_extended_login: bool,
    #[serde(rename = "webservices")]
    pub web_services: WebServices,
    #[serde(rename = "dsInfo")]
    pub ds_info: Option<DataSetInfo>,
    #[serde(deserialize_with = "null_default")]
    pub apps_order: Vec<String>,
    pub apps: Option<serde_json::Value>,
    pub request_info: Option<RequestInfo>,
    pub version: Option<i64>,
}

impl LoginResponse {
    /// The embedded account status code, if the response carried account info.
    pub fn account_status(&self) -> Option<i64> {
        self.ds_info.as_ref().map(|info| info.status_code)
    }

    /// True when the account status equals the "active" value.
    pub fn is_active(&self) -> bool {
        self.account_status() == Some(ACTIVE_ACCOUNT_STATUS)
    }

    pub fn dsid(&self) -> Option<u64> {
        self.ds_info.as_ref().and_then(|info| info.dsid)
    }
}

/// Per-service base URLs returned at login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebServices {
    pub findme: Option<WebService>,
    pub contacts: Option<WebService>,
    pub push: Option<WebService>,
    pub account: Option<WebService>,
    pub calendar: Option<WebService>,
    pub reminders: Option<WebService>,
    pub ubiquity: Option<WebService>,
    pub keyvalue: Option<WebService>,
    pub streams: Option<WebService>,
}

impl WebServices {
    fn url_of(service: &Option<WebService>) -> Option<&str> {
        service.as_ref().and_then(|s| s.url.as_deref())
    }

    pub fn findme_url(&self) -> Option<&str> {
        Self::url_of(&self.findme)
    }

    pub fn contacts_url(&self) -> Option<&str> {
        Self::url_of(&self.contacts)
    }

    pub fn push_url(&self) -> Option<&str> {
        Self::url_of(&self.push)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebService {
    pub status: Option<String>,
    pub url: Option<String>,
}

/// Account ("data set") information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSetInfo {
    /// Numeric account identifier. Sometimes sent as a string.
    #[serde(deserialize_with = "opt_number_from_str_or_num")]
    pub dsid: Option<u64>,
    #[serde(deserialize_with = "number_from_str_or_num")]
    pub status_code: i64,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub apple_id: Option<String>,
    pub apple_id_alias: Option<String>,
    #[serde(rename = "iCloudAppleIdAlias")]
    pub icloud_apple_id_alias: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub apple_id_aliases: Vec<String>,
    pub primary_email: Option<String>,
    pub primary_email_verified: Option<bool>,
    pub locked: Option<bool>,
    pub is_paid_developer: Option<bool>,
    #[serde(rename = "hasICloudQualifyingDevice")]
    pub has_icloud_qualifying_device: Option<bool>,
    #[serde(rename = "gilligan-invited")]
    pub gilligan_invited: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestInfo {
    pub region: Option<String>,
    pub time_zone: Option<String>,
    pub country: Option<String>,
}
