//! Supervised polling loop.
//!
//! Polls immediately, then sleeps for the interval between polls. Failures
//! are handled by the configured [`PollFailurePolicy`]; the loop always
//! reports why it stopped with a `PollingStopped` event.

use std::sync::{Arc, Weak};
use std::time::Duration;

use icloud_core::config::PollFailurePolicy;
use icloud_core::{EventDispatcher, PollingStopReason};
use tokio_util::sync::CancellationToken;

use super::tracker::DeviceTracker;

pub(super) async fn run(
    tracker: Weak<DeviceTracker>,
    events: Arc<EventDispatcher>,
    interval: Duration,
    policy: PollFailurePolicy,
    cancel: CancellationToken,
) {
    let reason = supervise(&tracker, interval, &policy, &cancel).await;
    match &reason {
        PollingStopReason::Cancelled => tracing::debug!("devices: polling loop cancelled"),
        other => tracing::warn!(reason = ?other, "devices: polling loop ended"),
    }
    events.emit_polling_stopped(&reason);
}

async fn supervise(
    tracker: &Weak<DeviceTracker>,
    interval: Duration,
    policy: &PollFailurePolicy,
    cancel: &CancellationToken,
) -> PollingStopReason {
    let mut failures: u32 = 0;
    let mut backoff: Option<Duration> = None;

    loop {
        let Some(current) = tracker.upgrade() else {
            return PollingStopReason::Cancelled;
        };
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return PollingStopReason::Cancelled,
            outcome = current.poll() => outcome,
        };

        let delay = match outcome {
            Ok(_) => {
                failures = 0;
                backoff = None;
                interval
            }
            Err(e) if e.is_not_connected() => {
                return PollingStopReason::Error {
                    reason: e.to_string(),
                };
            }
            Err(e) => match policy {
                PollFailurePolicy::Terminate => {
                    return PollingStopReason::Error {
                        reason: e.to_string(),
                    };
                }
                PollFailurePolicy::Retry { max_attempts, .. } => {
                    failures += 1;
                    if failures >= *max_attempts {
                        return PollingStopReason::RetriesExhausted {
                            attempts: failures,
                            reason: e.to_string(),
                        };
                    }
                    let delay = policy.next_backoff(backoff).unwrap_or(interval);
                    backoff = Some(delay);
                    tracing::warn!(
                        attempt = failures,
                        delay_ms = delay.as_millis() as u64,
                        "devices: poll failed, retrying: {e}"
                    );
                    delay
                }
                PollFailurePolicy::Escalate => {
                    current.escalate();
                    return PollingStopReason::Escalated {
                        reason: e.to_string(),
                    };
                }
            },
        };
        drop(current);

        tokio::select! {
            _ = cancel.cancelled() => return PollingStopReason::Cancelled,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
