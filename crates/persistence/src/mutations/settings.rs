// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Settings-table writes.

use crate::diesel_schema::settings;
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

backend_fn! {

/// Writes a setting, replacing any previous value.
///
/// Delete-then-insert keeps the upsert backend-agnostic; SQLite and MySQL
/// disagree on `ON CONFLICT` syntax.
pub fn set_setting(conn: &mut _, name: &str, value: &str) -> Result<(), PersistenceError> {
    info!(name, "Writing setting");

    diesel::delete(settings::table)
        .filter(settings::name.eq(name))
        .execute(conn)?;

    diesel::insert_into(settings::table)
        .values((settings::name.eq(name), settings::value.eq(value)))
        .execute(conn)?;

    Ok(())
}

}
