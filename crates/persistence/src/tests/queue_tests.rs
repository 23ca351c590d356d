// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{create_test_contact, create_test_persistence, insert_test_contact};

#[test]
fn test_enqueue_and_find_by_email() {
    let mut persistence = create_test_persistence();
    let contact = insert_test_contact(&mut persistence, create_test_contact());
    let contact_id = contact.contact_id.unwrap();

    let queue_id = persistence
        .enqueue_provisioning(contact_id, &contact.email, "jane.doe.1", "S3cret!Pass")
        .unwrap();
    assert!(queue_id > 0);

    let entry = persistence
        .find_queue_entry_by_email("jane.doe@example.org")
        .unwrap()
        .unwrap();
    assert_eq!(entry.contact_id, contact_id);
    assert_eq!(entry.username, "jane.doe.1");
    assert!(!entry.enqueued_at.is_empty());

    assert_eq!(
        persistence
            .find_queue_entry_by_email("nobody@example.org")
            .unwrap(),
        None
    );
}

#[test]
fn test_initial_password_is_hashed() {
    let mut persistence = create_test_persistence();
    let contact = insert_test_contact(&mut persistence, create_test_contact());
    let contact_id = contact.contact_id.unwrap();

    persistence
        .enqueue_provisioning(contact_id, &contact.email, "jane.doe.1", "S3cret!Pass")
        .unwrap();

    let entry = persistence
        .get_queue_entry_for_contact(contact_id)
        .unwrap()
        .unwrap();
    assert_ne!(entry.password_hash, "S3cret!Pass");
    assert!(bcrypt::verify("S3cret!Pass", &entry.password_hash).unwrap());
}

#[test]
fn test_one_queue_entry_per_contact() {
    let mut persistence = create_test_persistence();
    let contact = insert_test_contact(&mut persistence, create_test_contact());
    let contact_id = contact.contact_id.unwrap();

    persistence
        .enqueue_provisioning(contact_id, &contact.email, "jane.doe.1", "S3cret!Pass")
        .unwrap();

    // The unique constraint on contact_id rejects a second entry
    let second = persistence.enqueue_provisioning(contact_id, &contact.email, "jane.doe.1", "Other!Pass1");
    assert!(second.is_err());
}

#[test]
fn test_delete_queue_entry_for_contact() {
    let mut persistence = create_test_persistence();
    let contact = insert_test_contact(&mut persistence, create_test_contact());
    let contact_id = contact.contact_id.unwrap();

    persistence
        .enqueue_provisioning(contact_id, &contact.email, "jane.doe.1", "S3cret!Pass")
        .unwrap();
    assert_eq!(persistence.count_queue_entries().unwrap(), 1);

    let rows = persistence.delete_queue_entry_for_contact(contact_id).unwrap();
    assert_eq!(rows, 1);
    assert_eq!(persistence.count_queue_entries().unwrap(), 0);

    // Deleting again affects zero rows; the workflow layer turns that into an error
    let rows = persistence.delete_queue_entry_for_contact(contact_id).unwrap();
    assert_eq!(rows, 0);
}
