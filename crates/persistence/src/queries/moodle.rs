// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Moodle user and role-assignment query operations.
//!
//! These read the local projection of the external Moodle user model.

use crate::data_models::{MoodleUserRow, RoleAssignmentRow};
use crate::diesel_schema::{moodle_role_assignments, moodle_users};
use crate::error::PersistenceError;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

backend_fn! {

/// Fetches a Moodle user by id.
#[allow(dead_code)]
pub fn get_moodle_user_by_id(
    conn: &mut _,
    moodle_user_id: i64,
) -> Result<Option<MoodleUserRow>, PersistenceError> {
    moodle_users::table
        .filter(moodle_users::moodle_user_id.eq(moodle_user_id))
        .first::<MoodleUserRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_moodle_user_by_id: {e}")))
}

}

backend_fn! {

/// Fetches a Moodle user by e-mail address.
///
/// Used by `is_provisioned_and_enabled` to decide whether a parent
/// already holds a live account.
#[allow(dead_code)]
pub fn get_moodle_user_by_email(
    conn: &mut _,
    email: &str,
) -> Result<Option<MoodleUserRow>, PersistenceError> {
    moodle_users::table
        .filter(moodle_users::email.eq(email))
        .order(moodle_users::moodle_user_id.asc())
        .first::<MoodleUserRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_moodle_user_by_email: {e}")))
}

}

backend_fn! {

/// Fetches a pupil's Moodle user by admissions number.
#[allow(dead_code)]
pub fn get_moodle_user_by_adno(
    conn: &mut _,
    adno: &str,
) -> Result<Option<MoodleUserRow>, PersistenceError> {
    moodle_users::table
        .filter(moodle_users::adno.eq(adno))
        .first::<MoodleUserRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_moodle_user_by_adno: {e}")))
}

}

backend_fn! {

/// Returns true if the role assignment already exists.
#[allow(dead_code)]
pub fn role_assignment_exists(
    conn: &mut _,
    moodle_user_id: i64,
    context_id: i64,
    role: &str,
) -> Result<bool, PersistenceError> {
    let count: i64 = moodle_role_assignments::table
        .filter(moodle_role_assignments::moodle_user_id.eq(moodle_user_id))
        .filter(moodle_role_assignments::context_id.eq(context_id))
        .filter(moodle_role_assignments::role.eq(role))
        .count()
        .get_result::<i64>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("role_assignment_exists: {e}")))?;

    Ok(count > 0)
}

}

backend_fn! {

/// Lists all role assignments held by a Moodle user.
#[allow(dead_code)]
pub fn list_role_assignments(
    conn: &mut _,
    moodle_user_id: i64,
) -> Result<Vec<RoleAssignmentRow>, PersistenceError> {
    moodle_role_assignments::table
        .filter(moodle_role_assignments::moodle_user_id.eq(moodle_user_id))
        .order(moodle_role_assignments::context_id.asc())
        .load::<RoleAssignmentRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_role_assignments: {e}")))
}

}
