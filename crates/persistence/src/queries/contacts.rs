// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact record query operations.

use crate::data_models::ContactRow;
use crate::diesel_schema::contacts;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use guardian_sync_domain::Contact;

backend_fn! {

/// Fetches one contact by its row id.
///
/// Returns `Ok(None)` if no row exists.
#[allow(dead_code)]
pub fn get_contact_by_id(
    conn: &mut _,
    contact_id: i64,
) -> Result<Option<Contact>, PersistenceError> {
    let row: Option<ContactRow> = contacts::table
        .filter(contacts::contact_id.eq(contact_id))
        .first::<ContactRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_contact_by_id: {e}")))?;

    row.map(ContactRow::into_contact).transpose()
}

}

backend_fn! {

/// Fetches one contact by its external MIS identifier.
///
/// Returns `Ok(None)` if no row exists.
#[allow(dead_code)]
pub fn get_contact_by_external_id(
    conn: &mut _,
    external_mis_id: &str,
) -> Result<Option<Contact>, PersistenceError> {
    let row: Option<ContactRow> = contacts::table
        .filter(contacts::external_mis_id.eq(external_mis_id))
        .first::<ContactRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_contact_by_external_id: {e}")))?;

    row.map(ContactRow::into_contact).transpose()
}

}

backend_fn! {

/// Lists contacts, optionally filtered by status, ordered by row id.
#[allow(dead_code)]
pub fn list_contacts(
    conn: &mut _,
    status: Option<&str>,
) -> Result<Vec<Contact>, PersistenceError> {
    let mut query = contacts::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(contacts::status.eq(status.to_string()));
    }

    let rows: Vec<ContactRow> = query
        .order(contacts::contact_id.asc())
        .load::<ContactRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_contacts: {e}")))?;

    rows.into_iter().map(ContactRow::into_contact).collect()
}

}

backend_fn! {

/// Counts contacts holding the given e-mail address.
#[allow(dead_code)]
pub fn count_contacts_with_email(
    conn: &mut _,
    email: &str,
) -> Result<i64, PersistenceError> {
    contacts::table
        .filter(contacts::email.eq(email))
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_contacts_with_email: {e}")))
}

}
