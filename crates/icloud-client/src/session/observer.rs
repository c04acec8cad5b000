use async_trait::async_trait;

/// Hook for components that hold session-derived state.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// Runs once a session is established, before the keep-alive loop starts.
    /// Failures must be handled here; the session stays usable regardless.
    async fn on_connected(&self) {}

    /// Runs during teardown, after the session has been withdrawn. Stop
    /// background work and clear cached state.
    async fn on_disconnecting(&self) {}
}
