// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact mapping mutation operations.

use crate::backend::PersistenceBackend;
use crate::diesel_schema::contact_mappings;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

backend_fn! {

/// Inserts a mapping linking a contact to a pupil's Moodle account.
///
/// # Errors
///
/// Returns an error if the insert fails (e.g. the contact/adno pair is
/// already mapped).
pub fn insert_contact_mapping(
    conn: &mut _,
    contact_id: i64,
    adno: &str,
    pupil_moodle_user_id: i64,
) -> Result<i64, PersistenceError> {
    info!(contact_id, adno, pupil_moodle_user_id, "Creating contact mapping");

    diesel::insert_into(contact_mappings::table)
        .values((
            contact_mappings::contact_id.eq(contact_id),
            contact_mappings::adno.eq(adno),
            contact_mappings::pupil_moodle_user_id.eq(pupil_moodle_user_id),
            contact_mappings::created_at
                .eq(diesel::dsl::sql::<diesel::sql_types::Text>("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;

    let mapping_id: i64 = conn.get_last_insert_rowid()?;

    debug!(mapping_id, "Contact mapping created");
    Ok(mapping_id)
}

}

backend_fn! {

/// Removes the mapping for a contact/adno pair.
///
/// Returns the affected-row count.
pub fn delete_mapping_by_adno(
    conn: &mut _,
    contact_id: i64,
    adno: &str,
) -> Result<usize, PersistenceError> {
    info!(contact_id, adno, "Removing contact mapping");

    let rows_affected: usize = diesel::delete(contact_mappings::table)
        .filter(contact_mappings::contact_id.eq(contact_id))
        .filter(contact_mappings::adno.eq(adno))
        .execute(conn)?;

    Ok(rows_affected)
}

}
