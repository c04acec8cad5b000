//! Event payloads.

use std::sync::Arc;

use crate::models::FindMyResponse;

/// Why the device polling loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollingStopReason {
    /// `stop_polling` (or a disconnect) cancelled the loop.
    Cancelled,
    /// A poll failed and the policy terminates on failure.
    Error { reason: String },
    /// The retry policy gave up after this many consecutive failures.
    RetriesExhausted { attempts: u32, reason: String },
    /// A poll failed and the policy escalated to a full disconnect.
    Escalated { reason: String },
}

/// Tagged notification delivered to subscribers, in emission order.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A poll succeeded (`statusCode == "200"`).
    Update(Arc<FindMyResponse>),
    /// A poll returned a non-success status, or no session was available
    /// (`None`).
    Failed(Option<Arc<FindMyResponse>>),
    PollingStopped(PollingStopReason),
    /// The session went from connected to disconnected.
    Disconnected,
}
