// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod backend_validation_tests;
mod contact_tests;
mod queue_tests;
mod settings_tests;

use crate::Persistence;
use guardian_sync_domain::Contact;

/// Creates a fresh in-memory persistence instance.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// Creates an unpersisted test contact.
pub fn create_test_contact() -> Contact {
    Contact::new(
        101,
        "8D2A-55C1",
        Some("Mrs"),
        "Jane",
        "Doe",
        "jane.doe@example.org",
    )
    .unwrap()
}

/// Creates an unpersisted test contact with distinct identity fields.
pub fn create_test_contact_with(mis_id: i64, external_mis_id: &str, email: &str) -> Contact {
    Contact::new(mis_id, external_mis_id, None, "Sam", "Smith", email).unwrap()
}

/// Inserts a contact and returns it with its id backfilled.
pub fn insert_test_contact(persistence: &mut Persistence, mut contact: Contact) -> Contact {
    let contact_id = persistence.insert_contact(&contact).unwrap();
    contact.contact_id = Some(contact_id);
    contact
}

/// Creates a pupil Moodle user and returns its id.
pub fn create_test_pupil(persistence: &mut Persistence, adno: &str) -> i64 {
    persistence
        .create_moodle_user(
            &format!("pupil.{}", adno.to_lowercase()),
            &format!("{}@pupils.example.org", adno.to_lowercase()),
            Some(adno),
        )
        .unwrap()
}
