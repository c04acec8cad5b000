//! Laws of the pure reconcile functions.

use std::collections::HashSet;

use icloud_client::contacts::reconcile::{filter_deleted, partition, rebuild_from_order};
use icloud_client::core::models::Contact;
use proptest::prelude::*;

fn make_contact(id: u8, note: &str) -> Contact {
    Contact {
        id: Some(format!("C-{id}")),
        notes: Some(note.to_string()),
        ..Contact::default()
    }
}

fn id_list(ids: &[u8]) -> Vec<String> {
    ids.iter().map(|id| format!("C-{id}")).collect()
}

proptest! {
    #[test]
    fn partition_splits_by_membership(
        batch in prop::collection::vec(0u8..20, 0..12),
        order in prop::collection::vec(0u8..20, 0..12),
    ) {
        let contacts: Vec<Contact> = batch.iter().map(|id| make_contact(*id, "b")).collect();
        let order = id_list(&order);
        let known: HashSet<&str> = order.iter().map(String::as_str).collect();

        let (existing, new) = partition(contacts.clone(), &order);

        prop_assert_eq!(existing.len() + new.len(), contacts.len());
        prop_assert!(existing.iter().all(|c| known.contains(c.id().unwrap())));
        prop_assert!(new.iter().all(|c| !known.contains(c.id().unwrap())));
    }

    #[test]
    fn rebuild_follows_order_and_prefers_updates(
        cached_ids in prop::collection::hash_set(0u8..20, 0..10),
        updated_ids in prop::collection::hash_set(0u8..20, 0..5),
        order in prop::collection::hash_set(0u8..20, 0..15),
    ) {
        let cached: Vec<Contact> =
            cached_ids.iter().map(|id| make_contact(*id, "cached")).collect();
        let updated: Vec<Contact> =
            updated_ids.iter().map(|id| make_contact(*id, "updated")).collect();
        let order: Vec<u8> = order.into_iter().collect();

        let rebuilt = rebuild_from_order(&id_list(&order), updated, &cached);

        let expected: Vec<String> = order
            .iter()
            .filter(|id| cached_ids.contains(id) || updated_ids.contains(id))
            .map(|id| format!("C-{id}"))
            .collect();
        let actual: Vec<String> = rebuilt.iter().filter_map(|c| c.id.clone()).collect();
        prop_assert_eq!(actual, expected);
        for contact in &rebuilt {
            let id: u8 = contact.id().unwrap()[2..].parse().unwrap();
            let want = if updated_ids.contains(&id) { "updated" } else { "cached" };
            prop_assert_eq!(contact.notes.as_deref(), Some(want));
        }
    }

    #[test]
    fn filter_deleted_removes_exactly_the_named_ids(
        present in prop::collection::vec(0u8..20, 0..12),
        removed in prop::collection::vec(0u8..20, 0..6),
    ) {
        let mut contacts: Vec<Contact> = present.iter().map(|id| make_contact(*id, "p")).collect();
        let removed_ids = id_list(&removed);

        filter_deleted(&mut contacts, &removed_ids);

        let expected: Vec<String> = present
            .iter()
            .filter(|id| !removed.contains(id))
            .map(|id| format!("C-{id}"))
            .collect();
        let actual: Vec<String> = contacts.iter().filter_map(|c| c.id.clone()).collect();
        prop_assert_eq!(actual, expected);
    }
}
