use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::SortOrder;

/// Contacts sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    /// Locale passed to the startup call, e.g. `en_US`.
    pub locale: String,
    /// Sort order used for the best-effort fetch after connecting.
    pub sort_order: SortOrder,
    pub fetch_on_connect: bool,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            locale: defaults::DEFAULT_LOCALE.to_string(),
            sort_order: SortOrder::default(),
            fetch_on_connect: defaults::DEFAULT_FETCH_ON_CONNECT,
        }
    }
}
