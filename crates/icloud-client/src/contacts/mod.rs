//! Contacts sync: token-versioned fetch, batched mutations, and reconciliation
//! of server responses into the cached list.

mod engine;
pub mod reconcile;

pub use engine::{AppliedChanges, ContactsSyncEngine, UpsertOutcome};
