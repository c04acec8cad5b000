//! Contacts sync state: the token pair plus the ordering it versions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::contacts::{Collection, ContactsResponse};

/// Token-versioned view of the contact list. Required by every mutation and
/// replaced as a whole after each successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub sync_token: String,
    pub pref_token: String,
    pub contacts_order: Vec<String>,
    pub collections: Vec<Collection>,
    pub header_positions: Value,
    pub me_card_id: Option<String>,
    pub synced_at: DateTime<Utc>,
}

impl SyncState {
    /// Build the state carried by a startup, changeset, or mutation response.
    /// Returns `None` when either token is missing.
    pub fn from_response(response: &ContactsResponse) -> Option<Self> {
        Some(Self {
            sync_token: response.sync_token.clone()?,
            pref_token: response.pref_token.clone()?,
            contacts_order: response.contacts_order.clone(),
            collections: response.collections.clone(),
            header_positions: response.header_positions.clone(),
            me_card_id: response.me_card_id.clone(),
            synced_at: Utc::now(),
        })
    }

    pub fn contains(&self, contact_id: &str) -> bool {
        self.contacts_order.iter().any(|id| id == contact_id)
    }

    pub fn len(&self) -> usize {
        self.contacts_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts_order.is_empty()
    }
}
