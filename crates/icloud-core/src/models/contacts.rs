//! Contacts ("co") service types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::serde_helpers::{is_false, null_default};
use crate::errors::ClientError;

/// Sort order requested from the startup call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    FirstLast,
    LastFirst,
}

impl SortOrder {
    /// Value of the `order` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::FirstLast => "first,last",
            Self::LastFirst => "last,first",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstLast => "first_last",
            Self::LastFirst => "last_first",
        })
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_last" | "first,last" | "first" => Ok(Self::FirstLast),
            "last_first" | "last,first" | "last" => Ok(Self::LastFirst),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// A contact card.
///
/// Every scalar and list field is omitted from the wire when unset or empty.
/// Fields the server sends that are not modelled here are kept in `extra` so
/// an edited card is written back without losing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    #[serde(rename = "contactId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Server-issued version tag, required for edits and deletes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "is_false", deserialize_with = "null_default")]
    pub is_company: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_default")]
    pub phones: Vec<LabeledValue>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_default")]
    pub email_addresses: Vec<LabeledValue>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_default")]
    pub urls: Vec<LabeledValue>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_default")]
    pub dates: Vec<LabeledValue>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_default")]
    pub related_names: Vec<LabeledValue>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_default")]
    pub street_addresses: Vec<ContactAddress>,
    #[serde(
        rename = "IMs",
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_default"
    )]
    pub ims: Vec<ImEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_default")]
    pub profiles: Vec<ProfileEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    /// A new, unsynced card with a fresh upper-case identifier.
    pub fn new() -> Self {
        Self {
            id: Some(new_contact_id()),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Name shown in contact lists: full name, then phonetic name, then
    /// nickname, then company, then `"n/a"`.
    pub fn display_name(&self) -> String {
        let candidates = [
            join_names(&[&self.first_name, &self.middle_name, &self.last_name]),
            join_names(&[&self.phonetic_first_name, &self.phonetic_last_name]),
            join_names(&[&self.nick_name]),
            join_names(&[&self.company_name]),
        ];
        candidates
            .into_iter()
            .find(|name| !name.is_empty())
            .unwrap_or_else(|| "n/a".to_string())
    }
}

/// Upper-case UUID v4, the identifier format the web client assigns.
pub fn new_contact_id() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

fn join_names(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .filter_map(|part| part.as_deref())
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A labelled string value (phone, e-mail, URL, date, related name).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabeledValue {
    pub field: Option<String>,
    pub label: Option<String>,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            label: Some(label.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<AddressField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<ImField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImField {
    #[serde(rename = "userName", skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(rename = "IMService", skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

/// Social profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// The account's own card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeCard {
    pub me_card_id: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub contacts: Vec<Contact>,
}

/// Response of the startup, changeset, and mutation endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactsResponse {
    #[serde(deserialize_with = "null_default")]
    pub contacts_order: Vec<String>,
    pub header_positions: Value,
    pub sync_token: Option<String>,
    pub pref_token: Option<String>,
    pub me_card_id: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub groups: Vec<Value>,
    #[serde(deserialize_with = "null_default")]
    pub collections: Vec<Collection>,
    /// Full list on startup; only the changed cards on mutations.
    #[serde(deserialize_with = "null_default")]
    pub contacts: Vec<Contact>,
    pub deletes: Option<DeletedContacts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collection {
    pub collection_id: Option<String>,
    pub etag: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub groups_order: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeletedContacts {
    #[serde(deserialize_with = "null_default")]
    pub contact_ids: Vec<String>,
}

/// Body of the add and edit requests.
#[derive(Debug, Serialize)]
pub struct ContactsUpdateRequest<'a> {
    pub contacts: &'a [Contact],
}

/// Body of the delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteRequest {
    pub contacts: Vec<DeleteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteEntry {
    #[serde(rename = "contactId")]
    pub contact_id: String,
    pub etag: String,
}

impl TryFrom<&Contact> for DeleteEntry {
    type Error = ClientError;

    fn try_from(contact: &Contact) -> Result<Self, Self::Error> {
        let contact_id = contact.id.clone().ok_or_else(|| ClientError::IncompleteContact {
            contact_id: "<none>".to_string(),
            field: "contactId",
        })?;
        let etag = contact.etag.clone().ok_or_else(|| ClientError::IncompleteContact {
            contact_id: contact_id.clone(),
            field: "etag",
        })?;
        Ok(Self { contact_id, etag })
    }
}
