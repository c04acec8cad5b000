//! # icloud-client
//!
//! Client for the iCloud web services. A [`SessionManager`] logs in and keeps
//! the session cookie fresh; a [`DeviceTracker`] runs the Find My init/refresh
//! polling protocol and relays alerts; a [`ContactsSyncEngine`] performs the
//! token-versioned contacts sync and reconciles mutations into a cached list.
//!
//! [`ICloudClient`] wires the three together over one event dispatcher.

pub mod client;
pub mod codec;
pub mod contacts;
pub mod devices;
pub mod session;
mod tasks;
pub mod transport;

pub use client::ICloudClient;
pub use contacts::{AppliedChanges, ContactsSyncEngine, UpsertOutcome};
pub use devices::{DeviceTracker, TrackerPhase};
pub use session::{AccountSummary, SessionManager, SessionObserver};
pub use transport::{BodyEncoding, Connector, HttpConnector, HttpRequest, Method, Transport};

pub use icloud_core as core;
