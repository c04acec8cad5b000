//! Wire schema tests against recorded payloads.

use fixtures::{load_fixture, load_fixture_text};
use icloud_core::constants::SERVER_CONTEXT_ID;
use icloud_core::errors::ClientError;
use icloud_core::models::{
    ClientContext, Contact, ContactsResponse, ContactsUpdateRequest, DeleteEntry, DeleteRequest,
    FindMyRequest, FindMyResponse, LabeledValue, LoginCredentials, LoginResponse, MeCard,
    ServerContext, SortOrder, SyncState,
};
use serde_json::json;

// ─── Login ─────────────────────────────────────────────────

#[test]
fn credentials_use_snake_case_wire_names() {
    let creds = LoginCredentials::new("jordan@example.test", "hunter2", true);
    let value = serde_json::to_value(&creds).unwrap();
    assert_eq!(
        value,
        json!({"apple_id": "jordan@example.test", "password": "hunter2", "extended_login": true})
    );
}

#[test]
fn credentials_debug_redacts_password() {
    let creds = LoginCredentials::new("jordan@example.test", "hunter2", false);
    let debug = format!("{creds:?}");
    assert!(!debug.contains("hunter2"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn login_response_parses_string_dsid() {
    let response: LoginResponse = load_fixture("wire/login_active.json");
    assert_eq!(response.dsid(), Some(8_123_456_789));
    assert!(response.is_active());
    assert_eq!(
        response.web_services.findme_url(),
        Some("https://p01-fmipweb.icloud.test:443")
    );
    assert_eq!(
        response.web_services.contacts_url(),
        Some("https://p01-contactsws.icloud.test:443")
    );
    assert_eq!(
        response.web_services.push_url(),
        Some("https://p01-pushws.icloud.test:443")
    );
    let info = response.ds_info.as_ref().unwrap();
    assert_eq!(info.full_name.as_deref(), Some("Jordan Example"));
    assert_eq!(info.gilligan_invited, Some(true));
    assert_eq!(info.has_icloud_qualifying_device, Some(true));
    assert_eq!(response.apps_order.len(), 4);
}

#[test]
fn login_response_numeric_dsid_and_inactive_status() {
    let response: LoginResponse = load_fixture("wire/login_locked.json");
    assert_eq!(response.dsid(), Some(8_123_456_789));
    assert_eq!(response.account_status(), Some(1));
    assert!(!response.is_active());
    assert!(response.apps_order.is_empty());
}

#[test]
fn login_response_without_ds_info_is_inactive() {
    let response: LoginResponse = serde_json::from_str("{}").unwrap();
    assert!(!response.is_active());
    assert_eq!(response.dsid(), None);
}

#[test]
fn login_response_without_dsid_keeps_it_absent() {
    let response: LoginResponse =
        serde_json::from_str(r#"{"dsInfo":{"statusCode":2}}"#).unwrap();
    assert!(response.is_active());
    assert_eq!(response.dsid(), None);
}

// ─── Find My ───────────────────────────────────────────────

#[test]
fn client_context_wire_names() {
    let value = serde_json::to_value(ClientContext::default()).unwrap();
    assert_eq!(
        value,
        json!({
            "apiVersion": "3.0",
            "appName": "iCloud Find (Web)",
            "appVersion": "2.0",
            "inactiveTime": 0,
            "timezone": "Canada/Eastern",
            "webStats": "0:16"
        })
    );
}

#[test]
fn init_request_carries_only_client_context() {
    let ctx = ClientContext::default();
    let value = serde_json::to_value(FindMyRequest::new(&ctx, None)).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 1);
    assert!(obj.contains_key("clientContext"));
}

#[test]
fn alert_request_carries_device_and_subject() {
    let ctx = ClientContext::default();
    let server = ServerContext::default();
    let value =
        serde_json::to_value(FindMyRequest::new(&ctx, Some(&server)).alert("DEV-1", "Hello"))
            .unwrap();
    assert_eq!(value["device"], "DEV-1");
    assert_eq!(value["subject"], "Hello");
    assert!(value.get("serverContext").is_some());
}

#[test]
fn find_my_response_parses_devices() {
    let response: FindMyResponse = load_fixture("wire/find_my_init.json");
    assert!(response.is_success());
    let devices = response.devices.as_ref().unwrap();
    assert_eq!(devices.len(), 2);

    let phone = &devices[0];
    assert_eq!(phone.id, "DEV-IPHONE");
    assert!(phone.is_class("iPhone"));
    assert_eq!(phone.battery_percent(), Some(82.0));
    assert!(phone.extra.contains_key("features"));
    let location = phone.location.as_ref().unwrap();
    assert_eq!(location.coordinates(), Some((43.6532, -79.3832)));
    assert_eq!(
        location.observed_at().unwrap().timestamp_millis(),
        1_700_000_000_500
    );

    let mac = &devices[1];
    assert!(mac.location.is_none());
    assert_eq!(mac.label(), "Jordan's MacBook Pro");

    assert_eq!(
        response.user_info.as_ref().unwrap().first_name.as_deref(),
        Some("Jordan")
    );
}

#[test]
fn numeric_status_code_is_accepted() {
    let response: FindMyResponse = serde_json::from_str(r#"{"statusCode": 200}"#).unwrap();
    assert!(response.is_success());
    let failed: FindMyResponse = serde_json::from_str(r#"{"statusCode": "500"}"#).unwrap();
    assert!(!failed.is_success());
}

#[test]
fn server_context_echoes_unknown_fields() {
    let raw = load_fixture_text("wire/find_my_init.json");
    let original: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let response: FindMyResponse = serde_json::from_str(&raw).unwrap();
    let ctx = response.server_context.unwrap();

    assert_eq!(ctx.callback_interval().unwrap().as_millis(), 5_000);
    assert_eq!(ctx.prs_id, Some(8_123_456_789));
    assert!(ctx.extra.contains_key("imageBaseUrl"));

    let echoed = serde_json::to_value(&ctx).unwrap();
    assert_eq!(echoed, original["serverContext"]);
}

#[test]
fn stamp_overwrites_identifier() {
    let response: FindMyResponse = load_fixture("wire/find_my_init.json");
    let mut ctx = response.server_context.unwrap();
    assert_eq!(ctx.id.as_deref(), Some("ignored-by-client"));
    ctx.stamp();
    assert_eq!(ctx.id.as_deref(), Some(SERVER_CONTEXT_ID));
    let echoed = serde_json::to_value(&ctx).unwrap();
    assert_eq!(echoed["server_ctx"], "server_ctx");
}

// ─── Contacts ──────────────────────────────────────────────

#[test]
fn new_contact_has_uppercase_uuid() {
    let contact = Contact::new();
    let id = contact.id().unwrap();
    assert_eq!(id.len(), 36);
    assert_eq!(id, id.to_uppercase());
    assert_ne!(Contact::new().id, contact.id);
}

#[test]
fn empty_contact_fields_are_omitted() {
    let mut contact = Contact::new();
    contact.first_name = Some("Avery".to_string());
    let value = serde_json::to_value(&contact).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert!(obj.contains_key("contactId"));
    assert!(obj.contains_key("firstName"));
    assert!(!obj.contains_key("isCompany"));
    assert!(!obj.contains_key("phones"));
}

#[test]
fn contact_wire_names() {
    let mut contact = Contact::new();
    contact.nick_name = Some("Ave".to_string());
    contact.is_company = true;
    contact.phones.push(LabeledValue::new("MOBILE", "+1 555 0100"));
    let value = serde_json::to_value(&contact).unwrap();
    assert_eq!(value["nickName"], "Ave");
    assert_eq!(value["isCompany"], true);
    assert_eq!(
        value["phones"],
        json!([{"field": "+1 555 0100", "label": "MOBILE"}])
    );
}

#[test]
fn startup_response_parses_sub_records() {
    let response: ContactsResponse = load_fixture("wire/contacts_startup.json");
    assert_eq!(
        response.contacts_order,
        vec!["CONTACT-A", "CONTACT-B", "CONTACT-C"]
    );
    assert_eq!(response.contacts.len(), 3);

    let a = &response.contacts[0];
    let address = a.street_addresses[0].field.as_ref().unwrap();
    assert_eq!(address.postal_code.as_deref(), Some("M5V 1A1"));
    assert_eq!(address.country_code.as_deref(), Some("CA"));
    assert_eq!(a.extra["prsId"], "opaque-server-field");

    let b = &response.contacts[1];
    let im = b.ims[0].field.as_ref().unwrap();
    assert_eq!(im.service.as_deref(), Some("Jabber"));
    assert_eq!(b.profiles[0].user.as_deref(), Some("blake"));

    let c = &response.contacts[2];
    assert!(c.is_company);
    assert_eq!(c.display_name(), "Cedar Works");
}

#[test]
fn unknown_contact_fields_survive_reserialization() {
    let response: ContactsResponse = load_fixture("wire/contacts_startup.json");
    let value = serde_json::to_value(&response.contacts[0]).unwrap();
    assert_eq!(value["prsId"], "opaque-server-field");
    assert_eq!(value["contactId"], "CONTACT-A");
}

#[test]
fn null_contact_list_is_empty() {
    let response: ContactsResponse = load_fixture("wire/contacts_delete_b.json");
    assert!(response.contacts.is_empty());
    assert_eq!(response.deletes.unwrap().contact_ids, vec!["CONTACT-B"]);
}

#[test]
fn me_card_parses() {
    let me: MeCard = load_fixture("wire/me_card.json");
    assert_eq!(me.me_card_id.as_deref(), Some("CONTACT-ME"));
    assert_eq!(me.contacts[0].email_addresses.len(), 1);
}

#[test]
fn display_name_fallback_chain() {
    let mut contact = Contact::default();
    assert_eq!(contact.display_name(), "n/a");

    contact.company_name = Some("Cedar Works".to_string());
    assert_eq!(contact.display_name(), "Cedar Works");

    contact.nick_name = Some("Ced".to_string());
    assert_eq!(contact.display_name(), "Ced");

    contact.phonetic_last_name = Some("Seeder".to_string());
    assert_eq!(contact.display_name(), "Seeder");

    contact.first_name = Some("Casey".to_string());
    contact.last_name = Some("Cedar".to_string());
    assert_eq!(contact.display_name(), "Casey Cedar");

    contact.middle_name = Some("  ".to_string());
    assert_eq!(contact.display_name(), "Casey Cedar");
}

#[test]
fn update_request_wraps_contacts() {
    let contacts = vec![Contact::new()];
    let value = serde_json::to_value(ContactsUpdateRequest { contacts: &contacts }).unwrap();
    assert_eq!(value["contacts"].as_array().unwrap().len(), 1);
}

#[test]
fn delete_entry_requires_id_and_etag() {
    let mut contact = Contact::new();
    let err = DeleteEntry::try_from(&contact).unwrap_err();
    assert!(matches!(err, ClientError::IncompleteContact { field: "etag", .. }));

    contact.etag = Some("C=1@U=a".to_string());
    let entry = DeleteEntry::try_from(&contact).unwrap();
    let value = serde_json::to_value(DeleteRequest { contacts: vec![entry] }).unwrap();
    assert_eq!(value["contacts"][0]["contactId"], contact.id.clone().unwrap());
    assert_eq!(value["contacts"][0]["etag"], "C=1@U=a");

    contact.id = None;
    let err = DeleteEntry::try_from(&contact).unwrap_err();
    assert!(matches!(err, ClientError::IncompleteContact { field: "contactId", .. }));
}

#[test]
fn sort_order_query_values() {
    assert_eq!(SortOrder::FirstLast.as_query(), "first,last");
    assert_eq!(SortOrder::LastFirst.as_query(), "last,first");
    assert_eq!("last_first".parse::<SortOrder>().unwrap(), SortOrder::LastFirst);
    assert_eq!("first,last".parse::<SortOrder>().unwrap(), SortOrder::FirstLast);
    assert!("middle".parse::<SortOrder>().is_err());
}

// ─── SyncState ─────────────────────────────────────────────

#[test]
fn sync_state_from_startup() {
    let response: ContactsResponse = load_fixture("wire/contacts_startup.json");
    let state = SyncState::from_response(&response).unwrap();
    assert_eq!(state.sync_token, "HwoQEgwAAAAAAAAAAAAAAAAYASgB");
    assert_eq!(state.pref_token, "914266193");
    assert_eq!(state.len(), 3);
    assert!(state.contains("CONTACT-B"));
    assert!(!state.contains("CONTACT-Z"));
    assert_eq!(state.collections.len(), 1);
}

#[test]
fn sync_state_requires_both_tokens() {
    let mut response: ContactsResponse = load_fixture("wire/contacts_startup.json");
    response.pref_token = None;
    assert!(SyncState::from_response(&response).is_none());
}
