//! Wire schema for the login, Find My, and Contacts services.
//!
//! Field names on the wire are fixed by the service and differ from the Rust
//! field names; every remapping and "omit when default" rule is declared on
//! the types here so the codec never needs to know about individual fields.

pub mod contacts;
pub mod find_my;
pub mod login;
mod serde_helpers;
pub mod sync;

pub use contacts::{
    AddressField, Collection, Contact, ContactAddress, ContactsResponse, ContactsUpdateRequest,
    DeleteEntry, DeleteRequest, DeletedContacts, ImEntry, ImField, LabeledValue, MeCard,
    ProfileEntry, SortOrder,
};
pub use find_my::{
    ClientContext, Device, DeviceLocation, FindMyRequest, FindMyResponse, ServerContext,
    ServerTimeZone, UserInfo, UserPreferences, WebPrefs,
};
pub use login::{
    DataSetInfo, LoginCredentials, LoginResponse, RequestInfo, WebService, WebServices,
};
pub use sync::SyncState;
