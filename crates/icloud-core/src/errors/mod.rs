//! Error taxonomy. One enum per concern, all built on `thiserror`.

pub mod client_error;
pub mod config_error;
pub mod transport_error;

pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use transport_error::TransportError;

/// Result alias used by every public client operation.
pub type ClientResult<T> = Result<T, ClientError>;
