//! Handle for a cancellable background loop.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A spawned loop together with the token that stops it.
#[derive(Debug)]
pub(crate) struct LoopHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl LoopHandle {
    /// Spawn `body` with a fresh cancellation token.
    pub(crate) fn spawn<F, Fut>(body: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(body(cancel.clone()));
        Self { cancel, handle }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request cancellation and wait until the loop has exited.
    pub(crate) async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                tracing::warn!("tasks: background loop panicked: {e}");
            }
        }
    }
}
