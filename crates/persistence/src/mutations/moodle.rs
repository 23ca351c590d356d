// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Moodle user and role-assignment mutation operations.
//!
//! The moodle_users table is a local projection of the external Moodle
//! instance. `create_moodle_user` and `set_moodle_user_suspended` exist
//! for tests and for seeding a development database; in production the
//! projection is refreshed by the host's sync job.

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{moodle_role_assignments, moodle_users};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

backend_fn! {

/// Creates a Moodle user row.
///
/// # Errors
///
/// Returns an error if the insert fails (e.g. duplicate username).
pub fn create_moodle_user(
    conn: &mut _,
    username: &str,
    email: &str,
    adno: Option<&str>,
) -> Result<i64, PersistenceError> {
    info!(username, email, "Creating Moodle user");

    diesel::insert_into(moodle_users::table)
        .values((
            moodle_users::username.eq(username),
            moodle_users::email.eq(email),
            moodle_users::adno.eq(adno),
            moodle_users::is_suspended.eq(0),
        ))
        .execute(conn)?;

    let moodle_user_id: i64 = conn.get_last_insert_rowid()?;

    debug!(moodle_user_id, "Moodle user created");
    Ok(moodle_user_id)
}

}

backend_fn! {

/// Sets or clears the suspended flag on a Moodle user.
pub fn set_moodle_user_suspended(
    conn: &mut _,
    moodle_user_id: i64,
    suspended: bool,
) -> Result<(), PersistenceError> {
    info!(moodle_user_id, suspended, "Updating Moodle user suspension");

    diesel::update(moodle_users::table)
        .filter(moodle_users::moodle_user_id.eq(moodle_user_id))
        .set(moodle_users::is_suspended.eq(i32::from(suspended)))
        .execute(conn)?;

    Ok(())
}

}

backend_fn! {

/// Deletes a Moodle user row.
///
/// Test fixture helper for the broken-mapping path: a mapping whose pupil
/// user has disappeared is skipped on reload.
#[allow(dead_code)]
pub fn delete_moodle_user(
    conn: &mut _,
    moodle_user_id: i64,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(moodle_users::table)
        .filter(moodle_users::moodle_user_id.eq(moodle_user_id))
        .execute(conn)?;

    Ok(rows_affected)
}

}

backend_fn! {

/// Ensures a role assignment exists for a user in a context.
///
/// Returns true if a new assignment was created, false if one was
/// already present.
pub fn ensure_role_assignment(
    conn: &mut _,
    moodle_user_id: i64,
    context_id: i64,
    role: &str,
) -> Result<bool, PersistenceError> {
    let existing: i64 = moodle_role_assignments::table
        .filter(moodle_role_assignments::moodle_user_id.eq(moodle_user_id))
        .filter(moodle_role_assignments::context_id.eq(context_id))
        .filter(moodle_role_assignments::role.eq(role))
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("ensure_role_assignment: {e}")))?;

    if existing > 0 {
        debug!(moodle_user_id, context_id, role, "Role assignment already present");
        return Ok(false);
    }

    diesel::insert_into(moodle_role_assignments::table)
        .values((
            moodle_role_assignments::moodle_user_id.eq(moodle_user_id),
            moodle_role_assignments::context_id.eq(context_id),
            moodle_role_assignments::role.eq(role),
        ))
        .execute(conn)?;

    info!(moodle_user_id, context_id, role, "Role assignment created");
    Ok(true)
}

}
