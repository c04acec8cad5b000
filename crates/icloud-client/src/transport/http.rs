//! reqwest-backed transport with a per-session cookie jar.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use icloud_core::errors::TransportError;
use icloud_core::ClientConfig;
use reqwest::header::{CONTENT_TYPE, ORIGIN, REFERER};

use super::{Connector, HttpRequest, Method, Transport};

/// Builds one [`HttpTransport`] per login, each with its own cookie jar.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    origin: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpConnector {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            origin: config.endpoints.home_url.clone(),
            timeout: config.request_timeout(),
            user_agent: config.transport.user_agent.clone(),
        }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new(&ClientConfig::default())
    }
}

impl Connector for HttpConnector {
    fn open(&self) -> Result<Arc<dyn Transport>, TransportError> {
        let jar = Arc::new(reqwest::cookie::Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .gzip(true)
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::network(e.to_string()))?;
        Ok(Arc::new(HttpTransport {
            client,
            origin: self.origin.clone(),
        }))
    }
}

/// HTTP transport. Cookies set by any response are replayed on later requests
/// through the same instance.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    origin: String,
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<String, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        builder = builder.header(ORIGIN, self.origin.as_str());
        if let Some(referer) = &request.referer {
            builder = builder.header(REFERER, referer.as_str());
        }
        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, request.encoding.content_type())
                .body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            tracing::debug!(
                url = %request.url,
                status = status.as_u16(),
                "transport: unsuccessful response"
            );
            return Err(TransportError::Protocol {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
