// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact record mutation operations.

use crate::backend::PersistenceBackend;
use crate::diesel_schema::contacts;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use guardian_sync_domain::{Contact, ContactStatus};
use tracing::{debug, info};

backend_fn! {

/// Inserts a new contact row.
///
/// A freshly inserted record always starts in `pending` status, whatever
/// the in-memory value says; the caller's struct is corrected by the
/// workflow layer before this runs.
///
/// # Errors
///
/// Returns an error if the insert fails (e.g. duplicate external MIS id).
pub fn insert_contact(conn: &mut _, contact: &Contact) -> Result<i64, PersistenceError> {
    info!(
        "Inserting contact for MIS record {} ({})",
        contact.mis_id, contact.email
    );

    diesel::insert_into(contacts::table)
        .values((
            contacts::mis_id.eq(contact.mis_id),
            contacts::external_mis_id.eq(&contact.external_mis_id),
            contacts::moodle_user_id.eq(contact.moodle_user_id),
            contacts::title.eq(contact.title.as_deref()),
            contacts::forename.eq(&contact.forename),
            contacts::surname.eq(&contact.surname),
            contacts::email.eq(&contact.email),
            contacts::status.eq(ContactStatus::Pending.as_str()),
            contacts::staff_comment.eq(contact.staff_comment.as_deref()),
            contacts::system_comment.eq(&contact.system_comment),
            contacts::created_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
            contacts::updated_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    let contact_id: i64 = conn.get_last_insert_rowid()?;

    info!(contact_id, "Contact created");
    Ok(contact_id)
}

}

backend_fn! {

/// Updates all mutable fields of an existing contact row.
///
/// Returns the affected-row count (0 if the row has gone missing).
///
/// # Errors
///
/// Returns an error if the contact has no id or the update fails.
pub fn update_contact(conn: &mut _, contact: &Contact) -> Result<usize, PersistenceError> {
    let contact_id: i64 = contact
        .contact_id
        .ok_or_else(|| PersistenceError::Other("update_contact: contact has no id".to_string()))?;

    debug!(contact_id, status = contact.status.as_str(), "Updating contact");

    let rows_affected: usize =
        diesel::update(contacts::table.filter(contacts::contact_id.eq(contact_id)))
            .set((
                contacts::mis_id.eq(contact.mis_id),
                contacts::external_mis_id.eq(&contact.external_mis_id),
                contacts::moodle_user_id.eq(contact.moodle_user_id),
                contacts::title.eq(contact.title.as_deref()),
                contacts::forename.eq(&contact.forename),
                contacts::surname.eq(&contact.surname),
                contacts::email.eq(&contact.email),
                contacts::status.eq(contact.status.as_str()),
                contacts::staff_comment.eq(contact.staff_comment.as_deref()),
                contacts::system_comment.eq(&contact.system_comment),
                contacts::approved_at.eq(contact.approved_at.as_deref()),
                contacts::synced_at.eq(contact.synced_at.as_deref()),
                contacts::updated_at
                    .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

    Ok(rows_affected)
}

}

backend_fn! {

/// Updates only the system-comment column of a contact row.
///
/// Used by `append_system_comment` so a comment append does not rewrite
/// fields another caller may have touched.
pub fn update_system_comment(
    conn: &mut _,
    contact_id: i64,
    system_comment: &str,
) -> Result<usize, PersistenceError> {
    debug!(contact_id, "Appending to system comment");

    let rows_affected: usize =
        diesel::update(contacts::table.filter(contacts::contact_id.eq(contact_id)))
            .set((
                contacts::system_comment.eq(system_comment),
                contacts::updated_at
                    .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

    Ok(rows_affected)
}

}

backend_fn! {

/// Deletes a contact row.
///
/// # Errors
///
/// Returns `PersistenceError::ContactNotFound` if no row was deleted.
pub fn delete_contact(conn: &mut _, contact_id: i64) -> Result<(), PersistenceError> {
    info!(contact_id, "Deleting contact");

    let rows_affected: usize = diesel::delete(contacts::table)
        .filter(contacts::contact_id.eq(contact_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ContactNotFound(contact_id));
    }

    Ok(())
}

}
