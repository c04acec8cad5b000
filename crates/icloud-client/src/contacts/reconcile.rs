//! Pure list operations used to fold server responses into the cache.

use std::collections::{HashMap, HashSet};

use icloud_core::models::Contact;

/// Split a batch into `(existing, new)`: contacts whose id appears in
/// `ordered_ids` are edits, everything else is an add. Order within each side
/// follows the batch.
pub fn partition(batch: Vec<Contact>, ordered_ids: &[String]) -> (Vec<Contact>, Vec<Contact>) {
    let known: HashSet<&str> = ordered_ids.iter().map(String::as_str).collect();
    batch
        .into_iter()
        .partition(|contact| contact.id().is_some_and(|id| known.contains(id)))
}

/// Rebuild the cached list in `order`, preferring a card from `updated` over
/// the cached one with the same id.
///
/// Ids with no card on either side are skipped.
pub fn rebuild_from_order(
    order: &[String],
    updated: Vec<Contact>,
    cached: &[Contact],
) -> Vec<Contact> {
    let mut updated: HashMap<String, Contact> = updated
        .into_iter()
        .filter_map(|contact| Some((contact.id.clone()?, contact)))
        .collect();
    let cached: HashMap<&str, &Contact> = cached
        .iter()
        .filter_map(|contact| Some((contact.id()?, contact)))
        .collect();

    order
        .iter()
        .filter_map(|id| {
            if let Some(contact) = updated.remove(id) {
                return Some(contact);
            }
            if let Some(contact) = cached.get(id.as_str()) {
                return Some((*contact).clone());
            }
            tracing::warn!(contact_id = %id, "contacts: ordered id has no card, skipping");
            None
        })
        .collect()
}

/// Drop every contact whose id is in `removed`.
pub fn filter_deleted(contacts: &mut Vec<Contact>, removed: &[String]) {
    if removed.is_empty() {
        return;
    }
    let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
    contacts.retain(|contact| contact.id().map_or(true, |id| !removed.contains(id)));
}
