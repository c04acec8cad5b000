use std::sync::Arc;

use icloud_core::errors::TransportError;
use icloud_core::models::LoginResponse;

use super::urls::ServiceUrls;
use crate::transport::{HttpRequest, Transport};

/// Who is logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSummary {
    pub dsid: u64,
    pub apple_id: Option<String>,
    pub full_name: Option<String>,
    pub primary_email: Option<String>,
    pub is_extended_login: bool,
}

/// A live, fully populated session: cookie-bearing transport, account id,
/// and service URLs. Never exists in a partial state.
#[derive(Debug, Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    urls: ServiceUrls,
    account: AccountSummary,
    generation: u64,
}

impl Session {
    /// Build a session from a login response. `None` unless the account is
    /// active and both the account id and every required service URL are
    /// present.
    pub(crate) fn establish(
        transport: Arc<dyn Transport>,
        response: &LoginResponse,
        generation: u64,
    ) -> Option<Self> {
        if !response.is_active() {
            return None;
        }
        let info = response.ds_info.as_ref()?;
        let dsid = info.dsid?;
        let urls = ServiceUrls::from_web_services(&response.web_services)?;
        Some(Self {
            transport,
            urls,
            account: AccountSummary {
                dsid,
                apple_id: info.apple_id.clone(),
                full_name: info.full_name.clone(),
                primary_email: info.primary_email.clone(),
                is_extended_login: response.is_extended_login,
            },
            generation,
        })
    }

    pub fn dsid(&self) -> u64 {
        self.account.dsid
    }

    pub fn urls(&self) -> &ServiceUrls {
        &self.urls
    }

    pub fn account(&self) -> &AccountSummary {
        &self.account
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn send(&self, request: HttpRequest) -> Result<String, TransportError> {
        self.transport.send(request).await
    }
}
