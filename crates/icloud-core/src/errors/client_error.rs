//! Errors surfaced by session, tracking, and contacts operations.

use super::{ConfigError, TransportError};

/// Error returned by every public client operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The operation needs a live session and there is none.
    #[error("not connected")]
    NotConnected,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to encode {endpoint} request: {reason}")]
    Encode { endpoint: String, reason: String },

    #[error("failed to decode {endpoint} response: {reason}")]
    Decode { endpoint: String, reason: String },

    /// A contacts mutation was attempted before any fetch established tokens.
    #[error("no contacts sync state; fetch contacts first")]
    SyncStateMissing,

    #[error("contact {contact_id} has no {field}")]
    IncompleteContact {
        contact_id: String,
        field: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }

    /// True for failures where no usable HTTP response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(TransportError::Network { .. }))
    }
}
