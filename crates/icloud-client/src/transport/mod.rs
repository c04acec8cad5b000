//! Transport seam. The session layer only needs "send this request with the
//! session's cookies and give me the body back"; everything HTTP-specific
//! sits behind [`Transport`].

mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use icloud_core::constants::{CONTENT_TYPE_FORM, CONTENT_TYPE_PLAIN};
use icloud_core::errors::TransportError;

pub use http::{HttpConnector, HttpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Content type a POST body is sent with.
///
/// The service expects JSON bodies under both; login and Find My use the
/// form content type, contacts mutations use plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Form,
    Plain,
}

impl BodyEncoding {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Form => CONTENT_TYPE_FORM,
            Self::Plain => CONTENT_TYPE_PLAIN,
        }
    }
}

/// One HTTP exchange. `Origin` is added by the transport; the referer is per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub referer: Option<String>,
    pub body: Option<String>,
    pub encoding: BodyEncoding,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            referer: None,
            body: None,
            encoding: BodyEncoding::Plain,
        }
    }

    pub fn post(url: impl Into<String>, body: String, encoding: BodyEncoding) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            referer: None,
            body: Some(body),
            encoding,
        }
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

/// Cookie-carrying HTTP capability bound to one session.
///
/// Non-success HTTP statuses must be reported as [`TransportError::Protocol`];
/// anything where no response arrived as [`TransportError::Network`].
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Result<String, TransportError>;
}

/// Opens a fresh transport (with an empty cookie jar) for each login attempt.
pub trait Connector: Send + Sync + fmt::Debug {
    fn open(&self) -> Result<Arc<dyn Transport>, TransportError>;
}
