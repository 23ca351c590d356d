// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact mapping query operations.

use crate::data_models::ContactMappingRow;
use crate::diesel_schema::contact_mappings;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Lists all mappings for a contact, ordered by adno.
#[allow(dead_code)]
pub fn list_mappings_for_contact(
    conn: &mut _,
    contact_id: i64,
) -> Result<Vec<ContactMappingRow>, PersistenceError> {
    contact_mappings::table
        .filter(contact_mappings::contact_id.eq(contact_id))
        .order(contact_mappings::adno.asc())
        .load::<ContactMappingRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_mappings_for_contact: {e}")))
}

}

backend_fn! {

/// Fetches the mapping for a contact/adno pair, if any.
#[allow(dead_code)]
pub fn get_mapping_by_adno(
    conn: &mut _,
    contact_id: i64,
    adno: &str,
) -> Result<Option<ContactMappingRow>, PersistenceError> {
    contact_mappings::table
        .filter(contact_mappings::contact_id.eq(contact_id))
        .filter(contact_mappings::adno.eq(adno))
        .first::<ContactMappingRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_mapping_by_adno: {e}")))
}

}

backend_fn! {

/// Counts the mappings attached to a contact.
///
/// `delete()` refuses to remove a contact while this is non-zero.
#[allow(dead_code)]
pub fn count_mappings_for_contact(
    conn: &mut _,
    contact_id: i64,
) -> Result<i64, PersistenceError> {
    contact_mappings::table
        .filter(contact_mappings::contact_id.eq(contact_id))
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("count_mappings_for_contact: {e}")))
}

}
