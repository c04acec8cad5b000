//! In-memory stand-in for the iCloud web services.
//!
//! Routes match on a fragment of the request path. Each route has a queue
//! of replies; the last reply repeats once the queue is down to one.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use icloud_client::core::errors::TransportError;
use icloud_client::core::ClientConfig;
use icloud_client::{Connector, HttpRequest, ICloudClient, Transport};
use parking_lot::Mutex;

type Reply = Result<String, TransportError>;

#[derive(Debug, Default)]
struct ServerState {
    routes: Vec<(String, VecDeque<Reply>)>,
    requests: Vec<HttpRequest>,
    opened: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<ServerState>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request whose path contains `fragment` with `body`.
    pub fn route(&self, fragment: &str, body: impl Into<String>) {
        self.route_replies(fragment, vec![Ok(body.into())]);
    }

    pub fn route_fixture(&self, fragment: &str, fixture: &str) {
        self.route(fragment, fixtures::load_fixture_text(fixture));
    }

    pub fn route_error(&self, fragment: &str, error: TransportError) {
        self.route_replies(fragment, vec![Err(error)]);
    }

    /// Replies are served in order; the last one repeats.
    pub fn route_replies(&self, fragment: &str, replies: Vec<Reply>) {
        let mut state = self.state.lock();
        state.routes.retain(|(existing, _)| existing != fragment);
        state.routes.push((fragment.to_string(), replies.into()));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().requests.clone()
    }

    pub fn requests_to(&self, fragment: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| path_of(r).contains(fragment))
            .collect()
    }

    pub fn count(&self, fragment: &str) -> usize {
        self.requests_to(fragment).len()
    }

    pub fn opened(&self) -> usize {
        self.state.lock().opened
    }

    pub fn clear_requests(&self) {
        self.state.lock().requests.clear();
    }

    fn handle(&self, request: HttpRequest) -> Reply {
        let path = path_of(&request);
        let mut state = self.state.lock();
        state.requests.push(request);
        let Some((_, replies)) = state
            .routes
            .iter_mut()
            .rev()
            .find(|(fragment, _)| path.contains(fragment.as_str()))
        else {
            return Err(TransportError::Protocol {
                status: 404,
                body: format!("no route for {path}"),
            });
        };
        if replies.len() > 1 {
            replies.pop_front().unwrap_or_else(|| Err(TransportError::network("empty route")))
        } else {
            replies
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError::network("empty route")))
        }
    }
}

impl Connector for FakeServer {
    fn open(&self) -> Result<Arc<dyn Transport>, TransportError> {
        self.state.lock().opened += 1;
        Ok(Arc::new(FakeTransport {
            server: self.clone(),
        }))
    }
}

#[derive(Debug)]
struct FakeTransport {
    server: FakeServer,
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, TransportError> {
        self.server.handle(request)
    }
}

// ─── Helpers ───────────────────────────────────────────────

pub const APPLE_ID: &str = "jordan@example.test";
pub const PASSWORD: &str = "correct horse";

pub fn path_of(request: &HttpRequest) -> String {
    url::Url::parse(&request.url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| request.url.clone())
}

pub fn query_param(request: &HttpRequest, name: &str) -> Option<String> {
    let url = url::Url::parse(&request.url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_deref().unwrap_or("null")).expect("body is JSON")
}

/// Config with both on-connect hooks off so tests control every request.
pub fn make_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.endpoints.login_url = "https://setup.icloud.test/setup/ws/1/login".to_string();
    config.endpoints.home_url = "https://www.icloud.test".to_string();
    config.endpoints.find_referer_url = "https://www.icloud.test/find".to_string();
    config.session.keep_alive_interval_ms = 60_000;
    config.devices.poll_on_connect = false;
    config.contacts.fetch_on_connect = false;
    config
}

/// Server that accepts the login and answers the keep-alive.
pub fn make_server() -> FakeServer {
    let server = FakeServer::new();
    server.route_fixture("/login", "wire/login_active.json");
    server.route("/refreshWebAuth", "{}");
    server.route_fixture("/initClient", "wire/find_my_init.json");
    server.route_fixture("/refreshClient", "wire/find_my_init.json");
    server.route_fixture("/co/mecard/", "wire/me_card.json");
    server.route_fixture("/co/startup", "wire/contacts_startup.json");
    server
}

pub fn make_client(config: ClientConfig, server: &FakeServer) -> ICloudClient {
    ICloudClient::with_connector(config, Arc::new(server.clone()))
}

pub async fn connected_client(config: ClientConfig, server: &FakeServer) -> ICloudClient {
    let client = make_client(config, server);
    let connected = client.connect(APPLE_ID, PASSWORD, false).await.expect("login");
    assert!(connected, "fixture login should produce a session");
    client
}
