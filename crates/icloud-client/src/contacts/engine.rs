use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use icloud_core::errors::{ClientError, ClientResult};
use icloud_core::models::contacts::new_contact_id;
use icloud_core::models::{
    Contact, ContactsResponse, ContactsUpdateRequest, DeleteEntry, DeleteRequest, MeCard,
    SortOrder, SyncState,
};
use icloud_core::ClientConfig;
use parking_lot::RwLock;

use super::reconcile;
use crate::codec;
use crate::session::{Session, SessionManager, SessionObserver};
use crate::transport::{BodyEncoding, HttpRequest};

/// How many cards an upsert sent down each path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub added: usize,
    pub edited: usize,
}

impl UpsertOutcome {
    pub fn total(&self) -> usize {
        self.added + self.edited
    }
}

/// What a changeset pull did to the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedChanges {
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Add,
    Edit,
}

impl Mutation {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Add => "contactsAdd",
            Self::Edit => "contactsEdit",
        }
    }

    fn method(self) -> Option<&'static str> {
        match self {
            Self::Add => None,
            Self::Edit => Some("PUT"),
        }
    }
}

#[derive(Debug, Default)]
struct ContactsState {
    sync: Option<SyncState>,
    contacts: Vec<Contact>,
    me_card: Option<MeCard>,
    sort_order: SortOrder,
}

/// Keeps a local copy of the address book in step with the service.
///
/// All network operations are serialized; each one reads the token pair,
/// sends, and replaces the token pair from the response before the next may
/// begin.
pub struct ContactsSyncEngine {
    session: Arc<SessionManager>,
    referer: String,
    locale: String,
    default_sort: SortOrder,
    fetch_on_connect: bool,
    state: RwLock<ContactsState>,
    round_trip: tokio::sync::Mutex<()>,
}

impl ContactsSyncEngine {
    /// Build an engine and attach it to `session`'s lifecycle.
    pub fn new(session: Arc<SessionManager>, config: &ClientConfig) -> Arc<Self> {
        let engine = Arc::new(Self {
            referer: config.endpoints.home_url.clone(),
            locale: config.contacts.locale.clone(),
            default_sort: config.contacts.sort_order,
            fetch_on_connect: config.contacts.fetch_on_connect,
            state: RwLock::new(ContactsState::default()),
            round_trip: tokio::sync::Mutex::new(()),
            session,
        });
        let weak = Arc::downgrade(&engine);
        let observer: Weak<dyn SessionObserver> = weak;
        engine.session.attach(observer);
        engine
    }

    /// Load the me card and the full contact list, replacing the cache and
    /// the sync state.
    pub async fn fetch(&self, sort: SortOrder) -> ClientResult<Vec<Contact>> {
        let _round_trip = self.round_trip.lock().await;
        let session = self.session.current()?;
        let dsid = session.dsid();

        let raw = session
            .send(HttpRequest::get(session.urls().contacts_me_card(dsid)).referer(&self.referer))
            .await?;
        let me_card: MeCard = codec::decode("mecard", &raw)?;

        let url = session.urls().contacts_startup(dsid, &self.locale, sort);
        let raw = session
            .send(HttpRequest::get(url).referer(&self.referer))
            .await?;
        let response: ContactsResponse = codec::decode("startup", &raw)?;
        let sync = SyncState::from_response(&response).ok_or_else(|| missing_tokens("startup"))?;

        let mut state = self.state.write();
        tracing::info!(
            contacts = response.contacts.len(),
            sort = %sort,
            "contacts: fetched"
        );
        state.sync = Some(sync);
        state.contacts = response.contacts;
        state.me_card = Some(me_card);
        state.sort_order = sort;
        Ok(state.contacts.clone())
    }

    /// Fetch with the configured sort order.
    pub async fn fetch_default(&self) -> ClientResult<Vec<Contact>> {
        self.fetch(self.default_sort).await
    }

    /// Create or update a batch of cards.
    ///
    /// Cards without an id are given one. Cards whose id is already in the
    /// ordered list are edited, the rest are added; the edit request (if any)
    /// is sent before the add request. An empty batch sends nothing.
    pub async fn upsert(&self, contacts: &[Contact]) -> ClientResult<UpsertOutcome> {
        let _round_trip = self.round_trip.lock().await;
        let session = self.session.current()?;
        if contacts.is_empty() {
            return Ok(UpsertOutcome::default());
        }

        let batch: Vec<Contact> = contacts.iter().cloned().map(with_id).collect();
        let (existing, new) = {
            let state = self.state.read();
            let sync = state.sync.as_ref().ok_or(ClientError::SyncStateMissing)?;
            reconcile::partition(batch, &sync.contacts_order)
        };

        if !existing.is_empty() {
            self.submit(&session, Mutation::Edit, &existing).await?;
        }
        if !new.is_empty() {
            self.submit(&session, Mutation::Add, &new).await?;
        }
        Ok(UpsertOutcome {
            added: new.len(),
            edited: existing.len(),
        })
    }

    pub async fn upsert_one(&self, contact: &Contact) -> ClientResult<UpsertOutcome> {
        self.upsert(std::slice::from_ref(contact)).await
    }

    /// Delete a batch of cards. Each card must carry its id and etag.
    /// Returns the ids the service reports as removed.
    pub async fn delete(&self, contacts: &[Contact]) -> ClientResult<Vec<String>> {
        let _round_trip = self.round_trip.lock().await;
        let session = self.session.current()?;
        if contacts.is_empty() {
            return Ok(Vec::new());
        }

        let entries = contacts
            .iter()
            .map(DeleteEntry::try_from)
            .collect::<ClientResult<Vec<_>>>()?;
        let url = {
            let state = self.state.read();
            let sync = state.sync.as_ref().ok_or(ClientError::SyncStateMissing)?;
            session.urls().contact_card(session.dsid(), Some("DELETE"), sync)
        };
        let body = codec::encode("contactsDelete", &DeleteRequest { contacts: entries })?;
        let raw = session
            .send(HttpRequest::post(url, body, BodyEncoding::Plain).referer(&self.referer))
            .await?;
        let response: ContactsResponse = codec::decode("contactsDelete", &raw)?;
        let sync = SyncState::from_response(&response)
            .ok_or_else(|| missing_tokens("contactsDelete"))?;
        let removed = response.deletes.map(|d| d.contact_ids).unwrap_or_default();

        let mut state = self.state.write();
        reconcile::filter_deleted(&mut state.contacts, &removed);
        state.sync = Some(sync);
        tracing::info!(requested = contacts.len(), removed = removed.len(), "contacts: deleted");
        Ok(removed)
    }

    pub async fn delete_one(&self, contact: &Contact) -> ClientResult<Vec<String>> {
        self.delete(std::slice::from_ref(contact)).await
    }

    /// Pull changes made elsewhere since the current sync token and fold
    /// them into the cache.
    pub async fn changes(&self) -> ClientResult<AppliedChanges> {
        let _round_trip = self.round_trip.lock().await;
        let session = self.session.current()?;
        let url = {
            let state = self.state.read();
            let sync = state.sync.as_ref().ok_or(ClientError::SyncStateMissing)?;
            session.urls().contacts_changeset(session.dsid(), sync)
        };
        let raw = session
            .send(HttpRequest::get(url).referer(&self.referer))
            .await?;
        let response: ContactsResponse = codec::decode("changeset", &raw)?;
        let sync =
            SyncState::from_response(&response).ok_or_else(|| missing_tokens("changeset"))?;

        let applied = AppliedChanges {
            updated: response
                .contacts
                .iter()
                .filter_map(|c| c.id.clone())
                .collect(),
            removed: response
                .deletes
                .map(|d| d.contact_ids)
                .unwrap_or_default(),
        };
        let mut state = self.state.write();
        let mut rebuilt =
            reconcile::rebuild_from_order(&sync.contacts_order, response.contacts, &state.contacts);
        reconcile::filter_deleted(&mut rebuilt, &applied.removed);
        state.contacts = rebuilt;
        state.sync = Some(sync);
        tracing::info!(
            updated = applied.updated.len(),
            removed = applied.removed.len(),
            "contacts: changeset applied"
        );
        Ok(applied)
    }

    async fn submit(
        &self,
        session: &Session,
        mutation: Mutation,
        batch: &[Contact],
    ) -> ClientResult<()> {
        let endpoint = mutation.endpoint();
        let url = {
            let state = self.state.read();
            let sync = state.sync.as_ref().ok_or(ClientError::SyncStateMissing)?;
            session.urls().contact_card(session.dsid(), mutation.method(), sync)
        };
        let body = codec::encode(endpoint, &ContactsUpdateRequest { contacts: batch })?;
        let raw = session
            .send(HttpRequest::post(url, body, BodyEncoding::Plain).referer(&self.referer))
            .await?;
        let response: ContactsResponse = codec::decode(endpoint, &raw)?;
        let sync = SyncState::from_response(&response).ok_or_else(|| missing_tokens(endpoint))?;

        let mut state = self.state.write();
        let rebuilt =
            reconcile::rebuild_from_order(&sync.contacts_order, response.contacts, &state.contacts);
        state.contacts = rebuilt;
        state.sync = Some(sync);
        tracing::info!(endpoint, cards = batch.len(), "contacts: batch applied");
        Ok(())
    }

    /// Cached contact list, in server order.
    pub fn contacts(&self) -> Vec<Contact> {
        self.state.read().contacts.clone()
    }

    pub fn contact(&self, contact_id: &str) -> Option<Contact> {
        self.state
            .read()
            .contacts
            .iter()
            .find(|c| c.id() == Some(contact_id))
            .cloned()
    }

    pub fn me_card(&self) -> Option<MeCard> {
        self.state.read().me_card.clone()
    }

    pub fn sync_state(&self) -> Option<SyncState> {
        self.state.read().sync.clone()
    }

    pub fn ordered_ids(&self) -> Vec<String> {
        self.state
            .read()
            .sync
            .as_ref()
            .map(|s| s.contacts_order.clone())
            .unwrap_or_default()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.state.read().sort_order
    }

    /// Direct write access to the cached list. The sync state is untouched.
    pub fn update_cached<R>(&self, f: impl FnOnce(&mut Vec<Contact>) -> R) -> R {
        f(&mut self.state.write().contacts)
    }
}

#[async_trait]
impl SessionObserver for ContactsSyncEngine {
    async fn on_connected(&self) {
        if !self.fetch_on_connect {
            return;
        }
        if let Err(e) = self.fetch_default().await {
            tracing::warn!("contacts: initial fetch failed: {e}");
        }
    }

    async fn on_disconnecting(&self) {
        let _round_trip = self.round_trip.lock().await;
        *self.state.write() = ContactsState::default();
    }
}

impl fmt::Debug for ContactsSyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("ContactsSyncEngine")
            .field("contacts", &state.contacts.len())
            .field("synced", &state.sync.is_some())
            .field("sort_order", &state.sort_order)
            .field("locale", &self.locale)
            .finish()
    }
}

fn with_id(mut contact: Contact) -> Contact {
    if contact.id.is_none() {
        contact.id = Some(new_contact_id());
    }
    contact
}

fn missing_tokens(endpoint: &str) -> ClientError {
    ClientError::Decode {
        endpoint: endpoint.to_string(),
        reason: "response carries no syncToken/prefToken".to_string(),
    }
}
