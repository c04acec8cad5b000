//! Transport-level failures.

/// Failure reported by the HTTP transport.
///
/// `Protocol` means the server produced a well-formed but unsuccessful HTTP
/// response (e.g. 401 on a bad login). `Network` covers everything where no
/// usable response came back at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("protocol error: HTTP {status}")]
    Protocol { status: u16, body: String },

    #[error("network error: {reason}")]
    Network { reason: String },
}

impl TransportError {
    /// True when the server answered with an unsuccessful HTTP status.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
        }
    }
}
