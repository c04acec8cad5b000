//! Tests for the event dispatcher and channel subscription.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use icloud_core::events::{ClientEvent, ClientEventHandler, EventDispatcher, PollingStopReason};
use icloud_core::models::FindMyResponse;

// ─── Helpers ───────────────────────────────────────────────

#[derive(Default)]
struct CountingHandler {
    updates: AtomicUsize,
    failures: AtomicUsize,
    disconnects: AtomicUsize,
}

impl ClientEventHandler for CountingHandler {
    fn on_update(&self, _response: &Arc<FindMyResponse>) {
        self.updates.fetch_add(1, Ordering::SeqCst);
    }

    fn on_failed(&self, _response: Option<&Arc<FindMyResponse>>) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_disconnected(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}

struct PanickingHandler;

impl ClientEventHandler for PanickingHandler {
    fn on_update(&self, _response: &Arc<FindMyResponse>) {
        panic!("handler failure");
    }
}

fn make_response(status: &str) -> Arc<FindMyResponse> {
    Arc::new(FindMyResponse {
        status_code: status.to_string(),
        ..Default::default()
    })
}

// ─── Dispatch ──────────────────────────────────────────────

#[test]
fn empty_dispatcher_emits_without_handlers() {
    let dispatcher = EventDispatcher::new();
    assert_eq!(dispatcher.handler_count(), 0);
    dispatcher.emit_update(&make_response("200"));
    dispatcher.emit_disconnected();
}

#[test]
fn handlers_receive_each_event_kind() {
    let dispatcher = EventDispatcher::new();
    let handler = Arc::new(CountingHandler::default());
    dispatcher.register(handler.clone());

    dispatcher.emit_update(&make_response("200"));
    dispatcher.emit_failed(None);
    dispatcher.emit_failed(Some(&make_response("500")));
    dispatcher.emit_disconnected();
    dispatcher.emit_polling_stopped(&PollingStopReason::Cancelled);

    assert_eq!(handler.updates.load(Ordering::SeqCst), 1);
    assert_eq!(handler.failures.load(Ordering::SeqCst), 2);
    assert_eq!(handler.disconnects.load(Ordering::SeqCst), 1);
}

#[test]
fn panicking_handler_does_not_block_later_handlers() {
    let dispatcher = EventDispatcher::new();
    let handler = Arc::new(CountingHandler::default());
    dispatcher.register(Arc::new(PanickingHandler));
    dispatcher.register(handler.clone());

    dispatcher.emit_update(&make_response("200"));

    assert_eq!(dispatcher.handler_count(), 2);
    assert_eq!(handler.updates.load(Ordering::SeqCst), 1);
}

// ─── Channel subscription ──────────────────────────────────

#[test]
fn subscriber_receives_events_in_order() {
    let dispatcher = EventDispatcher::new();
    let mut rx = dispatcher.subscribe();

    dispatcher.emit_update(&make_response("200"));
    dispatcher.emit_failed(Some(&make_response("450")));
    dispatcher.emit_polling_stopped(&PollingStopReason::Error {
        reason: "network error: reset".to_string(),
    });
    dispatcher.emit_disconnected();

    match rx.try_recv().unwrap() {
        ClientEvent::Update(response) => assert!(response.is_success()),
        other => panic!("expected Update, got {other:?}"),
    }
    match rx.try_recv().unwrap() {
        ClientEvent::Failed(Some(response)) => assert_eq!(response.status_code, "450"),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(matches!(
        rx.try_recv().unwrap(),
        ClientEvent::PollingStopped(PollingStopReason::Error { .. })
    ));
    assert!(matches!(rx.try_recv().unwrap(), ClientEvent::Disconnected));
    assert!(rx.try_recv().is_err());
}

#[test]
fn dropped_subscriber_is_harmless() {
    let dispatcher = EventDispatcher::new();
    let rx = dispatcher.subscribe();
    drop(rx);
    dispatcher.emit_disconnected();
}
