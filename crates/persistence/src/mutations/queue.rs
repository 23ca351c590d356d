// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Provisioning-queue mutation operations.
//!
//! Approval enqueues a row for the external cron provisioner;
//! de-provisioning removes it. The initial password is hashed with bcrypt
//! here, at the persistence boundary, so plaintext never reaches a table.

use crate::backend::PersistenceBackend;
use crate::diesel_schema::provisioning_queue;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

backend_fn! {

/// Enqueues a contact for account provisioning.
///
/// # Errors
///
/// Returns an error if the password cannot be hashed or the insert fails
/// (e.g. the contact already has a queue entry).
pub fn enqueue_provisioning(
    conn: &mut _,
    contact_id: i64,
    email: &str,
    username: &str,
    initial_password: &str,
) -> Result<i64, PersistenceError> {
    info!(contact_id, username, "Enqueuing contact for provisioning");

    let password_hash: String = bcrypt::hash(initial_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash initial password: {e}")))?;

    diesel::insert_into(provisioning_queue::table)
        .values((
            provisioning_queue::contact_id.eq(contact_id),
            provisioning_queue::email.eq(email),
            provisioning_queue::username.eq(username),
            provisioning_queue::password_hash.eq(&password_hash),
            provisioning_queue::enqueued_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    let queue_id: i64 = conn.get_last_insert_rowid()?;

    debug!(queue_id, contact_id, "Queue entry created");
    Ok(queue_id)
}

}

backend_fn! {

/// Removes the queue entry for a contact.
///
/// Returns the affected-row count; the workflow layer treats zero as an
/// error because de-provisioning a contact that was never queued means
/// the record and the queue have diverged.
pub fn delete_queue_entry_for_contact(
    conn: &mut _,
    contact_id: i64,
) -> Result<usize, PersistenceError> {
    debug!(contact_id, "Deleting provisioning-queue entry");

    let rows_affected: usize = diesel::delete(provisioning_queue::table)
        .filter(provisioning_queue::contact_id.eq(contact_id))
        .execute(conn)?;

    Ok(rows_affected)
}

}
