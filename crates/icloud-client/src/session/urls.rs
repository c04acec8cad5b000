//! Endpoint URL builders over the per-service base URLs returned at login.

use icloud_core::constants::{
    CONTACTS_CARD_PATH, CONTACTS_CHANGESET_PATH, CONTACTS_ME_CARD_PATH, CONTACTS_STARTUP_PATH,
    FIND_MY_INIT_PATH, FIND_MY_PLAY_SOUND_PATH, FIND_MY_REFRESH_PATH, REFRESH_WEB_AUTH_PATH,
};
use icloud_core::models::{SortOrder, SyncState, WebServices};
use url::Url;

/// Base URLs of the services the client talks to. Only constructed when all
/// three are present and parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrls {
    findme: Url,
    contacts: Url,
    push: Url,
}

impl ServiceUrls {
    pub fn from_web_services(services: &WebServices) -> Option<Self> {
        Some(Self {
            findme: parse_base(services.findme_url()?)?,
            contacts: parse_base(services.contacts_url()?)?,
            push: parse_base(services.push_url()?)?,
        })
    }

    pub fn refresh_web_auth(&self, dsid: u64) -> Url {
        endpoint(&self.push, REFRESH_WEB_AUTH_PATH, dsid)
    }

    pub fn find_my_init(&self, dsid: u64) -> Url {
        endpoint(&self.findme, FIND_MY_INIT_PATH, dsid)
    }

    pub fn find_my_refresh(&self, dsid: u64) -> Url {
        endpoint(&self.findme, FIND_MY_REFRESH_PATH, dsid)
    }

    pub fn find_my_play_sound(&self, dsid: u64) -> Url {
        endpoint(&self.findme, FIND_MY_PLAY_SOUND_PATH, dsid)
    }

    pub fn contacts_me_card(&self, dsid: u64) -> Url {
        endpoint(&self.contacts, CONTACTS_ME_CARD_PATH, dsid)
    }

    pub fn contacts_startup(&self, dsid: u64, locale: &str, order: SortOrder) -> Url {
        let mut url = endpoint(&self.contacts, CONTACTS_STARTUP_PATH, dsid);
        url.query_pairs_mut()
            .append_pair("locale", locale)
            .append_pair("order", order.as_query());
        url
    }

    pub fn contacts_changeset(&self, dsid: u64, sync: &SyncState) -> Url {
        let mut url = endpoint(&self.contacts, CONTACTS_CHANGESET_PATH, dsid);
        append_tokens(&mut url, sync);
        url
    }

    /// Card endpoint. `method` is `None` for add, `PUT` for edit, `DELETE` for delete.
    pub fn contact_card(&self, dsid: u64, method: Option<&str>, sync: &SyncState) -> Url {
        let mut url = endpoint(&self.contacts, CONTACTS_CARD_PATH, dsid);
        if let Some(method) = method {
            url.query_pairs_mut().append_pair("method", method);
        }
        append_tokens(&mut url, sync);
        url
    }
}

fn parse_base(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => Some(url),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(url = raw, "session: unusable service url: {e}");
            None
        }
    }
}

fn endpoint(base: &Url, path: &str, dsid: u64) -> Url {
    let mut url = base.clone();
    let joined = format!("{}{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url.set_query(None);
    url.query_pairs_mut().append_pair("dsid", &dsid.to_string());
    url
}

fn append_tokens(url: &mut Url, sync: &SyncState) {
    url.query_pairs_mut()
        .append_pair("prefToken", &sync.pref_token)
        .append_pair("syncToken", &sync.sync_token);
}
