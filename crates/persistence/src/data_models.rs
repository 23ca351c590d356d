// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use diesel::prelude::*;
use guardian_sync_domain::{Contact, ContactStatus};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One row of the `contacts` table.
///
/// Field order matches the table's column order.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct ContactRow {
    pub contact_id: i64,
    pub mis_id: i64,
    pub external_mis_id: String,
    pub moodle_user_id: Option<i64>,
    pub title: Option<String>,
    pub forename: String,
    pub surname: String,
    pub email: String,
    pub status: String,
    pub staff_comment: Option<String>,
    pub system_comment: String,
    pub created_at: String,
    pub updated_at: String,
    pub approved_at: Option<String>,
    pub synced_at: Option<String>,
}

impl ContactRow {
    /// Converts the raw row into a domain [`Contact`].
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` if the stored
    /// status string is not a recognised contact status.
    pub fn into_contact(self) -> Result<Contact, PersistenceError> {
        let status = ContactStatus::from_str(&self.status).map_err(|e| {
            PersistenceError::ReconstructionError(format!(
                "contact {}: {e}",
                self.contact_id
            ))
        })?;

        Ok(Contact {
            contact_id: Some(self.contact_id),
            mis_id: self.mis_id,
            external_mis_id: self.external_mis_id,
            moodle_user_id: self.moodle_user_id,
            title: self.title,
            forename: self.forename,
            surname: self.surname,
            email: self.email,
            status,
            staff_comment: self.staff_comment,
            system_comment: self.system_comment,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            approved_at: self.approved_at,
            synced_at: self.synced_at,
        })
    }
}

/// One row of the `provisioning_queue` table.
///
/// These rows are consumed (and deleted) by the external cron provisioner;
/// this system only ever inserts and removes them.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct QueueEntryRow {
    pub queue_id: i64,
    pub contact_id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub enqueued_at: String,
}

/// One row of the `contact_mappings` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct ContactMappingRow {
    pub mapping_id: i64,
    pub contact_id: i64,
    pub adno: String,
    pub pupil_moodle_user_id: i64,
    pub created_at: String,
}

/// One row of the `moodle_users` table.
///
/// A local projection of the external Moodle user model, sufficient for
/// the lookups this system performs.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct MoodleUserRow {
    pub moodle_user_id: i64,
    pub username: String,
    pub email: String,
    pub adno: Option<String>,
    pub is_suspended: i32,
}

impl MoodleUserRow {
    /// Returns true if the Moodle account is suspended.
    #[must_use]
    pub const fn suspended(&self) -> bool {
        self.is_suspended != 0
    }
}

/// One row of the `moodle_role_assignments` table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct RoleAssignmentRow {
    pub role_assignment_id: i64,
    pub moodle_user_id: i64,
    pub context_id: i64,
    pub role: String,
}
