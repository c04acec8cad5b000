//! # icloud-core
//!
//! Foundation types for the iCloud web client: the wire schema for the login,
//! Find My and Contacts services, client configuration, the error taxonomy,
//! and the event dispatcher used to publish tracking and session notifications.
//!
//! This crate performs no I/O. The session, tracking, and sync behaviour lives
//! in `icloud-client`.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod models;
pub mod tracing_setup;

pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult, ConfigError, TransportError};
pub use events::{ClientEvent, ClientEventHandler, EventDispatcher, PollingStopReason};
