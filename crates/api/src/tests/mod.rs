// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod mapping_tests;

use crate::ContactRecord;
use guardian_sync_domain::Contact;
use guardian_sync_persistence::Persistence;

/// Creates a fresh in-memory persistence instance.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// Builds an unpersisted contact with the given identity.
pub fn build_contact(mis_id: i64, external_mis_id: &str, email: &str) -> Contact {
    Contact::new(mis_id, external_mis_id, Some("Mr"), "Alex", "Bloom", email).unwrap()
}

/// Inserts a contact and returns its record, id backfilled.
pub fn saved_record(
    persistence: &mut Persistence,
    mis_id: i64,
    external_mis_id: &str,
    email: &str,
) -> ContactRecord {
    let mut record = ContactRecord::new(build_contact(mis_id, external_mis_id, email));
    record.save(persistence).unwrap();
    record
}

/// Creates a pupil Moodle user carrying an adno and returns its id.
pub fn create_pupil(persistence: &mut Persistence, adno: &str) -> i64 {
    persistence
        .create_moodle_user(
            &format!("pupil.{}", adno.to_lowercase()),
            &format!("{}@pupils.example.org", adno.to_lowercase()),
            Some(adno),
        )
        .unwrap()
}
