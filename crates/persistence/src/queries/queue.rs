// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Provisioning-queue query operations.
//!
//! The queue is the staging table polled by the external cron provisioner.
//! The duplicate-e-mail check during approval reads it through
//! `find_queue_entry_by_email`.

use crate::data_models::QueueEntryRow;
use crate::diesel_schema::provisioning_queue;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Finds a queue entry holding the given e-mail address.
///
/// Returns the oldest entry if several exist.
#[allow(dead_code)]
pub fn find_queue_entry_by_email(
    conn: &mut _,
    email: &str,
) -> Result<Option<QueueEntryRow>, PersistenceError> {
    provisioning_queue::table
        .filter(provisioning_queue::email.eq(email))
        .order(provisioning_queue::queue_id.asc())
        .first::<QueueEntryRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_queue_entry_by_email: {e}")))
}

}

backend_fn! {

/// Fetches the queue entry for a specific contact, if any.
#[allow(dead_code)]
pub fn get_queue_entry_for_contact(
    conn: &mut _,
    contact_id: i64,
) -> Result<Option<QueueEntryRow>, PersistenceError> {
    provisioning_queue::table
        .filter(provisioning_queue::contact_id.eq(contact_id))
        .first::<QueueEntryRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_queue_entry_for_contact: {e}")))
}

}

backend_fn! {

/// Counts all entries currently awaiting the provisioner.
#[allow(dead_code)]
pub fn count_queue_entries(conn: &mut _) -> Result<i64, PersistenceError> {
    provisioning_queue::table
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_queue_entries: {e}")))
}

}
