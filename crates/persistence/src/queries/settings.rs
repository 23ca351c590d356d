// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Settings-table reads.
//!
//! Runtime options live in the `settings` table, mirroring the original
//! host's options store. The only option the workflow layer currently
//! reads is `static_role_contexts`.

use crate::diesel_schema::settings;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Reads a setting value by name.
///
/// Returns `Ok(None)` if the setting has never been written.
#[allow(dead_code)]
pub fn get_setting(
    conn: &mut _,
    name: &str,
) -> Result<Option<String>, PersistenceError> {
    settings::table
        .filter(settings::name.eq(name))
        .select(settings::value)
        .first::<String>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_setting: {e}")))
}

}
