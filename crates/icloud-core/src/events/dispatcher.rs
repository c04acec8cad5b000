//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::handler::{ChannelHandler, ClientEventHandler};
use super::types::{ClientEvent, PollingStopReason};
use crate::models::FindMyResponse;

/// Dispatcher shared by the session manager and the device tracker.
///
/// Handlers run in registration order. A handler that panics is logged and
/// skipped; later handlers still receive the event.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<Vec<Arc<dyn ClientEventHandler>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event handler.
    pub fn register(&self, handler: Arc<dyn ClientEventHandler>) {
        self.handlers.write().push(handler);
    }

    /// Register a channel-backed handler and return its receiving end.
    pub fn subscribe(&self) -> UnboundedReceiver<ClientEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.register(Arc::new(ChannelHandler::new(tx)));
        rx
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    fn emit<F: Fn(&dyn ClientEventHandler)>(&self, event: &'static str, f: F) {
        // Snapshot so handlers may register further handlers without deadlocking.
        let handlers = self.handlers.read().clone();
        for handler in &handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!(event, "events: handler panicked");
            }
        }
    }

    pub fn emit_update(&self, response: &Arc<FindMyResponse>) {
        self.emit("update", |h| h.on_update(response));
    }

    pub fn emit_failed(&self, response: Option<&Arc<FindMyResponse>>) {
        self.emit("failed", |h| h.on_failed(response));
    }

    pub fn emit_polling_stopped(&self, reason: &PollingStopReason) {
        self.emit("polling_stopped", |h| h.on_polling_stopped(reason));
    }

    pub fn emit_disconnected(&self) {
        self.emit("disconnected", |h| h.on_disconnected());
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
