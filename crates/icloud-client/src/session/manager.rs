//! Session lifecycle: login, keep-alive, and teardown.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use icloud_core::config::EndpointConfig;
use icloud_core::errors::{ClientError, ClientResult};
use icloud_core::models::{LoginCredentials, LoginResponse};
use icloud_core::{ClientConfig, EventDispatcher};
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use super::observer::SessionObserver;
use super::state::{AccountSummary, Session};
use crate::codec;
use crate::tasks::LoopHandle;
use crate::transport::{BodyEncoding, Connector, HttpRequest};

/// Owns the current [`Session`] and the keep-alive loop that refreshes it.
///
/// Connect and disconnect are serialized by a lifecycle lock. Components that
/// cache session-derived state register as [`SessionObserver`]s and are told
/// when a session starts and ends.
pub struct SessionManager {
    connector: Arc<dyn Connector>,
    endpoints: EndpointConfig,
    keep_alive_interval: Duration,
    events: Arc<EventDispatcher>,
    session: RwLock<Option<Session>>,
    keep_alive: Mutex<Option<LoopHandle>>,
    observers: RwLock<Vec<Weak<dyn SessionObserver>>>,
    generation: AtomicU64,
    lifecycle: tokio::sync::Mutex<()>,
}

impl SessionManager {
    pub fn new(
        connector: Arc<dyn Connector>,
        config: &ClientConfig,
        events: Arc<EventDispatcher>,
    ) -> Arc<Self> {
        Arc::new(Self {
            connector,
            endpoints: config.endpoints.clone(),
            keep_alive_interval: config.keep_alive_interval(),
            events,
            session: RwLock::new(None),
            keep_alive: Mutex::new(None),
            observers: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
            lifecycle: tokio::sync::Mutex::new(()),
        })
    }

    /// Register an observer. Observers are notified in registration order.
    pub fn attach(&self, observer: Weak<dyn SessionObserver>) {
        let mut observers = self.observers.write();
        observers.retain(|o| o.strong_count() > 0);
        observers.push(observer);
    }

    /// Log in, replacing any existing session.
    ///
    /// Returns `Ok(false)` when the service rejects the credentials or the
    /// account is not active. Network failures are returned as errors.
    pub async fn connect(
        self: &Arc<Self>,
        apple_id: &str,
        password: &str,
        extended_login: bool,
    ) -> ClientResult<bool> {
        self.connect_with(LoginCredentials::new(apple_id, password, extended_login))
            .await
    }

    pub async fn connect_with(
        self: &Arc<Self>,
        credentials: LoginCredentials,
    ) -> ClientResult<bool> {
        let _lifecycle = self.lifecycle.lock().await;
        self.teardown().await;

        let transport = self.connector.open()?;
        let body = codec::encode("login", &credentials)?;
        let request = HttpRequest::post(&self.endpoints.login_url, body, BodyEncoding::Form)
            .referer(&self.endpoints.home_url);
        let raw = match transport.send(request).await {
            Ok(raw) => raw,
            Err(e) if e.is_protocol() => {
                tracing::warn!(apple_id = %credentials.apple_id, "session: login rejected: {e}");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        let response: LoginResponse = codec::decode("login", &raw)?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(session) = Session::establish(transport, &response, generation) else {
            tracing::warn!(
                status = ?response.account_status(),
                "session: login did not produce an active account"
            );
            return Ok(false);
        };
        let dsid = session.dsid();
        *self.session.write() = Some(session);
        tracing::info!(dsid, generation, "session: connected");

        for observer in self.live_observers() {
            observer.on_connected().await;
        }
        self.start_keep_alive(generation);
        Ok(self.is_connected())
    }

    /// Stop the keep-alive loop, tear down observers, and drop the session.
    /// Emits `Disconnected` only if a session was live.
    pub async fn disconnect(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        self.teardown().await;
    }

    /// Disconnect only if the live session is still the one identified by
    /// `generation`. Used by background loops whose failure should not take
    /// down a session established after they started.
    pub(crate) async fn expire(&self, generation: u64) {
        let _lifecycle = self.lifecycle.lock().await;
        if self.generation() != Some(generation) {
            tracing::debug!(generation, "session: stale expiry ignored");
            return;
        }
        self.teardown().await;
    }

    async fn teardown(&self) {
        let keep_alive = self.keep_alive.lock().take();
        if let Some(handle) = keep_alive {
            handle.stop().await;
        }

        let previous = self.session.write().take();
        for observer in self.live_observers() {
            observer.on_disconnecting().await;
        }
        if let Some(session) = previous {
            tracing::info!(dsid = session.dsid(), "session: disconnected");
            self.events.emit_disconnected();
        }
    }

    /// One keep-alive round trip against the push service.
    pub async fn refresh(&self) -> ClientResult<()> {
        let session = self.current()?;
        let url = session.urls().refresh_web_auth(session.dsid());
        session
            .send(HttpRequest::get(url).referer(&self.endpoints.home_url))
            .await?;
        tracing::debug!(dsid = session.dsid(), "session: web auth refreshed");
        Ok(())
    }

    /// Snapshot of the live session.
    pub fn current(&self) -> ClientResult<Session> {
        self.session.read().clone().ok_or(ClientError::NotConnected)
    }

    pub fn is_connected(&self) -> bool {
        self.session.read().is_some()
    }

    pub fn dsid(&self) -> Option<u64> {
        self.session.read().as_ref().map(Session::dsid)
    }

    pub fn account(&self) -> Option<AccountSummary> {
        self.session.read().as_ref().map(|s| s.account().clone())
    }

    /// Generation of the live session. Each successful login gets a new one.
    pub fn generation(&self) -> Option<u64> {
        self.session.read().as_ref().map(Session::generation)
    }

    pub fn endpoints(&self) -> &EndpointConfig {
        &self.endpoints
    }

    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }

    fn live_observers(&self) -> Vec<Arc<dyn SessionObserver>> {
        self.observers.read().iter().filter_map(Weak::upgrade).collect()
    }

    fn start_keep_alive(self: &Arc<Self>, generation: u64) {
        let manager = Arc::downgrade(self);
        let interval = self.keep_alive_interval;
        let handle =
            LoopHandle::spawn(move |cancel| keep_alive_loop(manager, generation, interval, cancel));
        *self.keep_alive.lock() = Some(handle);
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("endpoints", &self.endpoints)
            .field("keep_alive_interval", &self.keep_alive_interval)
            .field("connected", &self.is_connected())
            .field("observers", &self.observers.read().len())
            .finish()
    }
}

/// Sleep, refresh, repeat. A failed refresh expires the session it was
/// started for; the expiry runs on its own task because teardown waits for
/// this loop to exit.
async fn keep_alive_loop(
    manager: Weak<SessionManager>,
    generation: u64,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
        let Some(manager) = manager.upgrade() else {
            return;
        };
        let result = tokio::select! {
            _ = cancel.cancelled() => return,
            result = manager.refresh() => result,
        };
        if let Err(e) = result {
            tracing::warn!(generation, "session: keep-alive failed, disconnecting: {e}");
            tokio::spawn(async move { manager.expire(generation).await });
            return;
        }
    }
}
