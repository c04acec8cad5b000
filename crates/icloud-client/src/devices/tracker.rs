use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use icloud_core::config::PollFailurePolicy;
use icloud_core::errors::ClientResult;
use icloud_core::models::{
    ClientContext, Device, FindMyRequest, FindMyResponse, ServerContext, UserInfo,
    UserPreferences,
};
use icloud_core::{ClientConfig, EventDispatcher};
use parking_lot::RwLock;

use super::poll_loop;
use crate::codec;
use crate::session::{Session, SessionManager, SessionObserver};
use crate::tasks::LoopHandle;
use crate::transport::{BodyEncoding, HttpRequest};

/// Where the tracker is in the init/refresh protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No server context held; the next poll calls `initClient`.
    Uninitialized,
    /// A server context is held; the next poll calls `refreshClient`.
    Tracking,
}

#[derive(Debug, Default)]
struct TrackerState {
    server_context: Option<ServerContext>,
    devices: Arc<Vec<Device>>,
    user_info: Option<UserInfo>,
    user_preferences: Option<UserPreferences>,
}

impl TrackerState {
    fn phase(&self) -> TrackerPhase {
        match self.server_context {
            Some(_) => TrackerPhase::Tracking,
            None => TrackerPhase::Uninitialized,
        }
    }
}

/// Tracks the account's devices through the Find My service.
///
/// Every round trip holds the tracker's request lock, so a foreground poll or
/// alert never interleaves with the polling loop's request.
pub struct DeviceTracker {
    session: Arc<SessionManager>,
    events: Arc<EventDispatcher>,
    client_context: ClientContext,
    referer: String,
    poll_interval: Duration,
    poll_on_connect: bool,
    policy: PollFailurePolicy,
    state: RwLock<TrackerState>,
    round_trip: tokio::sync::Mutex<()>,
    polling: tokio::sync::Mutex<Option<LoopHandle>>,
}

impl DeviceTracker {
    /// Build a tracker and attach it to `session`'s lifecycle.
    pub fn new(
        session: Arc<SessionManager>,
        config: &ClientConfig,
        events: Arc<EventDispatcher>,
    ) -> Arc<Self> {
        let tracker = Arc::new(Self {
            client_context: ClientContext::from(&config.devices.client_context),
            referer: config.endpoints.find_referer_url.clone(),
            poll_interval: config.poll_interval(),
            poll_on_connect: config.devices.poll_on_connect,
            policy: config.devices.failure_policy.clone(),
            state: RwLock::new(TrackerState::default()),
            round_trip: tokio::sync::Mutex::new(()),
            polling: tokio::sync::Mutex::new(None),
            session,
            events,
        });
        let weak = Arc::downgrade(&tracker);
        let observer: Weak<dyn SessionObserver> = weak;
        tracker.session.attach(observer);
        tracker
    }

    /// One round trip: `initClient` when uninitialized, `refreshClient`
    /// otherwise. Emits `Update` on status `"200"` and `Failed` on any other
    /// status or when there is no session.
    pub async fn poll(&self) -> ClientResult<Arc<FindMyResponse>> {
        let _round_trip = self.round_trip.lock().await;
        self.poll_locked().await
    }

    async fn poll_locked(&self) -> ClientResult<Arc<FindMyResponse>> {
        let session = match self.session.current() {
            Ok(session) => session,
            Err(e) => {
                self.events.emit_failed(None);
                return Err(e);
            }
        };
        let server_context = self.state.read().server_context.clone();
        let (endpoint, url) = match server_context {
            None => ("initClient", session.urls().find_my_init(session.dsid())),
            Some(_) => ("refreshClient", session.urls().find_my_refresh(session.dsid())),
        };
        let request = FindMyRequest::new(&self.client_context, server_context.as_ref());
        let response = Arc::new(self.exchange(&session, endpoint, url, &request).await?);
        self.absorb(&response, true);

        if response.is_success() {
            tracing::debug!(
                endpoint,
                devices = response.devices.as_ref().map_or(0, Vec::len),
                "devices: poll succeeded"
            );
            self.events.emit_update(&response);
        } else {
            tracing::warn!(endpoint, status = %response.status_code, "devices: poll not accepted");
            self.events.emit_failed(Some(&response));
        }
        Ok(response)
    }

    /// Play a sound with `message` on one device. Initializes first when no
    /// server context is held. Only the server context is taken from the
    /// response; the device snapshot is left alone.
    pub async fn alert(
        &self,
        message: &str,
        device_id: &str,
    ) -> ClientResult<Arc<FindMyResponse>> {
        let _round_trip = self.round_trip.lock().await;
        if self.phase() == TrackerPhase::Uninitialized {
            self.poll_locked().await?;
        }
        let session = self.session.current()?;
        let server_context = self.state.read().server_context.clone();
        let request = FindMyRequest::new(&self.client_context, server_context.as_ref())
            .alert(device_id, message);
        let url = session.urls().find_my_play_sound(session.dsid());
        let response = self.exchange(&session, "playSound", url, &request).await?;
        self.absorb(&response, false);
        tracing::info!(device_id, status = %response.status_code, "devices: alert sent");
        Ok(Arc::new(response))
    }

    /// Alert every known device of `class` (e.g. `iPhone`). Returns how many
    /// devices were alerted.
    pub async fn alert_device_class(&self, message: &str, class: &str) -> ClientResult<usize> {
        if self.phase() == TrackerPhase::Uninitialized {
            self.poll().await?;
        }
        let targets: Vec<String> = self
            .devices()
            .iter()
            .filter(|d| d.is_class(class))
            .map(|d| d.id.clone())
            .collect();
        for device_id in &targets {
            self.alert(message, device_id).await?;
        }
        Ok(targets.len())
    }

    /// Start the background polling loop, replacing any running one. The
    /// loop polls immediately, then every `interval` (or the configured
    /// default). Replacing a running loop resets the protocol to
    /// `initClient`; a server context from an earlier one-off poll is kept.
    pub async fn start_polling(self: &Arc<Self>, interval: Option<Duration>) -> ClientResult<()> {
        self.session.current()?;
        let interval = interval.unwrap_or(self.poll_interval);
        let mut polling = self.polling.lock().await;
        if let Some(previous) = polling.take() {
            previous.stop().await;
            self.reset_protocol().await;
        }

        let tracker = Arc::downgrade(self);
        let events = Arc::clone(&self.events);
        let policy = self.policy.clone();
        *polling = Some(LoopHandle::spawn(move |cancel| {
            poll_loop::run(tracker, events, interval, policy, cancel)
        }));
        tracing::info!(interval_ms = interval.as_millis() as u64, "devices: polling started");
        Ok(())
    }

    /// Stop the polling loop (if any) and drop the server context so the next
    /// poll starts over with `initClient`.
    pub async fn stop_polling(&self) {
        let handle = self.polling.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
            tracing::info!("devices: polling stopped");
        }
        self.reset_protocol().await;
    }

    pub async fn is_polling(&self) -> bool {
        self.polling
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn phase(&self) -> TrackerPhase {
        self.state.read().phase()
    }

    /// Latest device snapshot.
    pub fn devices(&self) -> Arc<Vec<Device>> {
        Arc::clone(&self.state.read().devices)
    }

    pub fn device(&self, device_id: &str) -> Option<Device> {
        self.state.read().devices.iter().find(|d| d.id == device_id).cloned()
    }

    pub fn server_context(&self) -> Option<ServerContext> {
        self.state.read().server_context.clone()
    }

    pub fn user_info(&self) -> Option<UserInfo> {
        self.state.read().user_info.clone()
    }

    pub fn user_preferences(&self) -> Option<UserPreferences> {
        self.state.read().user_preferences.clone()
    }

    pub fn client_context(&self) -> &ClientContext {
        &self.client_context
    }

    /// Ask the session manager to tear down the session this tracker is
    /// polling for. Runs detached; teardown stops the polling loop.
    pub(super) fn escalate(&self) {
        let Some(generation) = self.session.generation() else {
            return;
        };
        let session = Arc::clone(&self.session);
        tokio::spawn(async move { session.expire(generation).await });
    }

    async fn exchange(
        &self,
        session: &Session,
        endpoint: &str,
        url: url::Url,
        request: &FindMyRequest<'_>,
    ) -> ClientResult<FindMyResponse> {
        let body = codec::encode(endpoint, request)?;
        let request = HttpRequest::post(url, body, BodyEncoding::Form).referer(&self.referer);
        let raw = session.send(request).await?;
        codec::decode(endpoint, &raw)
    }

    fn absorb(&self, response: &FindMyResponse, replace_snapshot: bool) {
        let mut state = self.state.write();
        if let Some(server_context) = &response.server_context {
            let mut server_context = server_context.clone();
            server_context.stamp();
            state.server_context = Some(server_context);
        }
        if !replace_snapshot {
            return;
        }
        if let Some(devices) = &response.devices {
            state.devices = Arc::new(devices.clone());
        }
        if let Some(user_info) = &response.user_info {
            state.user_info = Some(user_info.clone());
        }
        if let Some(user_preferences) = &response.user_preferences {
            state.user_preferences = Some(user_preferences.clone());
        }
    }

    async fn reset_protocol(&self) {
        let _round_trip = self.round_trip.lock().await;
        self.state.write().server_context = None;
    }
}

#[async_trait]
impl SessionObserver for DeviceTracker {
    async fn on_connected(&self) {
        if !self.poll_on_connect {
            return;
        }
        if let Err(e) = self.poll().await {
            tracing::warn!("devices: initial poll failed: {e}");
        }
    }

    async fn on_disconnecting(&self) {
        self.stop_polling().await;
        let _round_trip = self.round_trip.lock().await;
        *self.state.write() = TrackerState::default();
    }
}

impl fmt::Debug for DeviceTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("DeviceTracker")
            .field("phase", &state.phase())
            .field("devices", &state.devices.len())
            .field("poll_interval", &self.poll_interval)
            .field("policy", &self.policy)
            .finish()
    }
}
