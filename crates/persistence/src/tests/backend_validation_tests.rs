// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB backend validation tests.
//!
//! These tests are marked `#[ignore]` and never run under plain
//! `cargo test`. They are executed by `cargo xtask test-mariadb`, which
//! starts a `MariaDB` container, sets `DATABASE_URL` and
//! `GUARDIAN_SYNC_TEST_BACKEND=mariadb`, runs the ignored tests with
//! `--test-threads=1`, and removes the container afterwards.
//!
//! Tests fail fast if the required environment is missing; nothing
//! silently skips.

use crate::Persistence;
use crate::tests::create_test_contact;
use guardian_sync_domain::ContactStatus;

/// Connects to the MariaDB instance provisioned by xtask.
///
/// Panics if the orchestration environment is missing, so a misconfigured
/// run fails loudly instead of validating nothing.
fn connect_mariadb() -> Persistence {
    let backend = std::env::var("GUARDIAN_SYNC_TEST_BACKEND")
        .expect("GUARDIAN_SYNC_TEST_BACKEND not set; run via `cargo xtask test-mariadb`");
    assert_eq!(backend, "mariadb", "unexpected test backend: {backend}");

    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL not set; run via `cargo xtask test-mariadb`");

    Persistence::new_with_mysql(&database_url).expect("Failed to connect to MariaDB")
}

/// Removes every row this test suite may have written.
///
/// MariaDB state persists across tests within one container, unlike the
/// per-test in-memory SQLite databases; `--test-threads=1` plus this
/// cleanup keeps the ignored tests independent.
fn clean_database(persistence: &mut Persistence) {
    for contact in persistence.list_contacts(None).unwrap_or_default() {
        if let Some(contact_id) = contact.contact_id {
            let _ = persistence.delete_queue_entry_for_contact(contact_id);
            for mapping in persistence
                .list_mappings_for_contact(contact_id)
                .unwrap_or_default()
            {
                let _ = persistence.delete_mapping_by_adno(contact_id, &mapping.adno);
            }
            let _ = persistence.delete_contact(contact_id);
        }
    }
}

#[test]
#[ignore = "requires MariaDB; run via `cargo xtask test-mariadb`"]
fn test_mariadb_migrations_and_foreign_keys() {
    let mut persistence = connect_mariadb();
    persistence
        .verify_foreign_key_enforcement()
        .expect("MariaDB must enforce foreign keys");
    clean_database(&mut persistence);
}

#[test]
#[ignore = "requires MariaDB; run via `cargo xtask test-mariadb`"]
fn test_mariadb_contact_round_trip() {
    let mut persistence = connect_mariadb();
    clean_database(&mut persistence);

    let contact = create_test_contact();
    let contact_id = persistence.insert_contact(&contact).unwrap();

    let mut stored = persistence.get_contact_by_id(contact_id).unwrap().unwrap();
    assert_eq!(stored.status, ContactStatus::Pending);
    assert_eq!(stored.external_mis_id, "8D2A-55C1");

    stored.set_status(ContactStatus::Approved).unwrap();
    let rows = persistence.update_contact(&stored).unwrap();
    assert_eq!(rows, 1);

    let reloaded = persistence.get_contact_by_id(contact_id).unwrap().unwrap();
    assert_eq!(reloaded.status, ContactStatus::Approved);

    clean_database(&mut persistence);
}

#[test]
#[ignore = "requires MariaDB; run via `cargo xtask test-mariadb`"]
fn test_mariadb_queue_constraints() {
    let mut persistence = connect_mariadb();
    clean_database(&mut persistence);

    let contact = create_test_contact();
    let contact_id = persistence.insert_contact(&contact).unwrap();

    persistence
        .enqueue_provisioning(contact_id, &contact.email, "jane.doe.1", "S3cret!Pass")
        .unwrap();

    // Unique constraint on contact_id holds on MariaDB too
    assert!(
        persistence
            .enqueue_provisioning(contact_id, &contact.email, "jane.doe.1", "Other!Pass1")
            .is_err()
    );

    // Foreign key enforcement: no queue entries for unknown contacts
    assert!(
        persistence
            .enqueue_provisioning(contact_id + 1000, "x@y.org", "x.y.0", "Other!Pass1")
            .is_err()
    );

    clean_database(&mut persistence);
}
