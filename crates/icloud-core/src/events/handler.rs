//! Observer trait and the channel adapter.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use super::types::{ClientEvent, PollingStopReason};
use crate::models::FindMyResponse;

/// Observer for client notifications. Every method has a no-op default.
///
/// Handlers are called synchronously on the task that produced the event and
/// must not block.
pub trait ClientEventHandler: Send + Sync {
    fn on_update(&self, _response: &Arc<FindMyResponse>) {}
    fn on_failed(&self, _response: Option<&Arc<FindMyResponse>>) {}
    fn on_polling_stopped(&self, _reason: &PollingStopReason) {}
    fn on_disconnected(&self) {}
}

/// Forwards every event into an mpsc channel as a [`ClientEvent`].
#[derive(Debug)]
pub struct ChannelHandler {
    tx: UnboundedSender<ClientEvent>,
}

impl ChannelHandler {
    pub fn new(tx: UnboundedSender<ClientEvent>) -> Self {
        Self { tx }
    }

    fn forward(&self, event: ClientEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(event);
    }
}

impl ClientEventHandler for ChannelHandler {
    fn on_update(&self, response: &Arc<FindMyResponse>) {
        self.forward(ClientEvent::Update(Arc::clone(response)));
    }

    fn on_failed(&self, response: Option<&Arc<FindMyResponse>>) {
        self.forward(ClientEvent::Failed(response.cloned()));
    }

    fn on_polling_stopped(&self, reason: &PollingStopReason) {
        self.forward(ClientEvent::PollingStopped(reason.clone()));
    }

    fn on_disconnected(&self) {
        self.forward(ClientEvent::Disconnected);
    }
}
