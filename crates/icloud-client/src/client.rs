//! Facade wiring the session, device tracker, and contacts engine together.

use std::sync::Arc;

use icloud_core::errors::ClientResult;
use icloud_core::{ClientConfig, ClientEvent, EventDispatcher};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::contacts::ContactsSyncEngine;
use crate::devices::DeviceTracker;
use crate::session::{AccountSummary, SessionManager};
use crate::transport::{Connector, HttpConnector};

/// One iCloud account: a session plus the services that hang off it.
///
/// The tracker is attached before the contacts engine, so on connect the
/// initial poll runs before the initial fetch.
#[derive(Debug)]
pub struct ICloudClient {
    config: ClientConfig,
    events: Arc<EventDispatcher>,
    session: Arc<SessionManager>,
    devices: Arc<DeviceTracker>,
    contacts: Arc<ContactsSyncEngine>,
}

impl ICloudClient {
    /// Validate `config` and build a client over HTTPS.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let connector = Arc::new(HttpConnector::new(&config));
        Ok(Self::with_connector(config, connector))
    }

    /// Build a client over a caller-supplied transport.
    pub fn with_connector(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        let events = Arc::new(EventDispatcher::new());
        let session = SessionManager::new(connector, &config, Arc::clone(&events));
        let devices = DeviceTracker::new(Arc::clone(&session), &config, Arc::clone(&events));
        let contacts = ContactsSyncEngine::new(Arc::clone(&session), &config);
        Self {
            config,
            events,
            session,
            devices,
            contacts,
        }
    }

    pub async fn connect(
        &self,
        apple_id: &str,
        password: &str,
        extended_login: bool,
    ) -> ClientResult<bool> {
        self.session.connect(apple_id, password, extended_login).await
    }

    pub async fn disconnect(&self) {
        self.session.disconnect().await;
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    pub fn account(&self) -> Option<AccountSummary> {
        self.session.account()
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn devices(&self) -> &Arc<DeviceTracker> {
        &self.devices
    }

    pub fn contacts(&self) -> &Arc<ContactsSyncEngine> {
        &self.contacts
    }

    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }

    /// Receive every event from now on, in emission order.
    pub fn subscribe(&self) -> UnboundedReceiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
