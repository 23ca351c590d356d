// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::PersistenceError;
use crate::tests::{
    create_test_contact, create_test_contact_with, create_test_persistence, insert_test_contact,
};
use guardian_sync_domain::ContactStatus;

#[test]
fn test_insert_forces_pending_status() {
    let mut persistence = create_test_persistence();

    let mut contact = create_test_contact();
    // Simulate a caller that left a stale status on the struct
    contact.status = ContactStatus::Approved;

    let contact_id = persistence.insert_contact(&contact).unwrap();
    let stored = persistence.get_contact_by_id(contact_id).unwrap().unwrap();

    assert_eq!(stored.status, ContactStatus::Pending);
}

#[test]
fn test_get_contact_by_id_round_trip() {
    let mut persistence = create_test_persistence();
    let contact = insert_test_contact(&mut persistence, create_test_contact());

    let stored = persistence
        .get_contact_by_id(contact.contact_id.unwrap())
        .unwrap()
        .unwrap();

    assert_eq!(stored.mis_id, 101);
    assert_eq!(stored.external_mis_id, "8D2A-55C1");
    assert_eq!(stored.email, "jane.doe@example.org");
    assert_eq!(stored.title.as_deref(), Some("Mrs"));
    assert!(stored.created_at.is_some());
    assert!(stored.approved_at.is_none());
}

#[test]
fn test_get_contact_by_id_missing() {
    let mut persistence = create_test_persistence();
    assert_eq!(persistence.get_contact_by_id(999).unwrap(), None);
}

#[test]
fn test_get_contact_by_external_id() {
    let mut persistence = create_test_persistence();
    insert_test_contact(&mut persistence, create_test_contact());

    let stored = persistence
        .get_contact_by_external_id("8D2A-55C1")
        .unwrap()
        .unwrap();
    assert_eq!(stored.forename, "Jane");

    assert_eq!(persistence.get_contact_by_external_id("NOPE").unwrap(), None);
}

#[test]
fn test_duplicate_external_id_rejected() {
    let mut persistence = create_test_persistence();
    insert_test_contact(&mut persistence, create_test_contact());

    let duplicate = create_test_contact_with(202, "8D2A-55C1", "other@example.org");
    assert!(persistence.insert_contact(&duplicate).is_err());
}

#[test]
fn test_update_contact_persists_fields() {
    let mut persistence = create_test_persistence();
    let mut contact = insert_test_contact(&mut persistence, create_test_contact());

    contact.set_status(ContactStatus::Approved).unwrap();
    contact.approved_at = Some("2026-03-02T10:30:00Z".to_string());
    contact.staff_comment = Some("Checked against MIS".to_string());
    contact.append_system_comment_line("2026-03-02T10:30:00Z", "Approved for provisioning");

    let rows = persistence.update_contact(&contact).unwrap();
    assert_eq!(rows, 1);

    let stored = persistence
        .get_contact_by_id(contact.contact_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ContactStatus::Approved);
    assert_eq!(stored.approved_at.as_deref(), Some("2026-03-02T10:30:00Z"));
    assert!(stored.system_comment.contains("Approved for provisioning"));
}

#[test]
fn test_update_system_comment_only() {
    let mut persistence = create_test_persistence();
    let contact = insert_test_contact(&mut persistence, create_test_contact());
    let contact_id = contact.contact_id.unwrap();

    let rows = persistence
        .update_system_comment(contact_id, "[2026-03-01T09:00:00Z] Imported from MIS")
        .unwrap();
    assert_eq!(rows, 1);

    let stored = persistence.get_contact_by_id(contact_id).unwrap().unwrap();
    assert_eq!(
        stored.system_comment,
        "[2026-03-01T09:00:00Z] Imported from MIS"
    );
    // Other fields untouched
    assert_eq!(stored.forename, "Jane");
}

#[test]
fn test_list_contacts_with_status_filter() {
    let mut persistence = create_test_persistence();
    insert_test_contact(&mut persistence, create_test_contact());
    let mut second = insert_test_contact(
        &mut persistence,
        create_test_contact_with(202, "GUID-2", "sam.smith@example.org"),
    );

    second.set_status(ContactStatus::Rejected).unwrap();
    persistence.update_contact(&second).unwrap();

    let all = persistence.list_contacts(None).unwrap();
    assert_eq!(all.len(), 2);

    let pending = persistence.list_contacts(Some("pending")).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].external_mis_id, "8D2A-55C1");

    let rejected = persistence.list_contacts(Some("rejected")).unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].external_mis_id, "GUID-2");
}

#[test]
fn test_count_contacts_with_email() {
    let mut persistence = create_test_persistence();
    insert_test_contact(&mut persistence, create_test_contact());
    insert_test_contact(
        &mut persistence,
        create_test_contact_with(202, "GUID-2", "jane.doe@example.org"),
    );

    let count = persistence
        .count_contacts_with_email("jane.doe@example.org")
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_delete_missing_contact_fails() {
    let mut persistence = create_test_persistence();
    let result = persistence.delete_contact(42);
    assert_eq!(result, Err(PersistenceError::ContactNotFound(42)));
}

#[test]
fn test_delete_contact() {
    let mut persistence = create_test_persistence();
    let contact = insert_test_contact(&mut persistence, create_test_contact());
    let contact_id = contact.contact_id.unwrap();

    persistence.delete_contact(contact_id).unwrap();
    assert_eq!(persistence.get_contact_by_id(contact_id).unwrap(), None);
}
