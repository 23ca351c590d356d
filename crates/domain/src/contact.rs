// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The contact record.
//!
//! A contact is one parent's account-provisioning request. The struct
//! mirrors the `contacts` table row; the persistence layer materialises
//! it on load, and the workflow layer mutates it and writes it back.

use crate::error::DomainError;
use crate::status::ContactStatus;
use crate::validation::validate_contact_fields;
use serde::{Deserialize, Serialize};

/// A parent's account-provisioning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// The persisted row id. `None` until the record has been inserted.
    pub contact_id: Option<i64>,
    /// The numeric MIS record id.
    pub mis_id: i64,
    /// The GUID-like external MIS identifier.
    pub external_mis_id: String,
    /// The linked Moodle account, once provisioned.
    pub moodle_user_id: Option<i64>,
    /// Honorific (Mr/Mrs/Dr/...), as supplied by the MIS.
    pub title: Option<String>,
    pub forename: String,
    pub surname: String,
    pub email: String,
    /// Lifecycle status; every change goes through [`Contact::set_status`].
    pub status: ContactStatus,
    /// Free text entered by school staff.
    pub staff_comment: Option<String>,
    /// Append-only audit log of lifecycle events.
    pub system_comment: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub approved_at: Option<String>,
    pub synced_at: Option<String>,
}

impl Contact {
    /// Creates a new, unpersisted contact in `Pending` status.
    ///
    /// Name and e-mail fields are trimmed; the title is dropped if empty.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if any identity field fails validation.
    pub fn new(
        mis_id: i64,
        external_mis_id: &str,
        title: Option<&str>,
        forename: &str,
        surname: &str,
        email: &str,
    ) -> Result<Self, DomainError> {
        validate_contact_fields(mis_id, external_mis_id, forename, surname, email)?;

        Ok(Self {
            contact_id: None,
            mis_id,
            external_mis_id: external_mis_id.trim().to_string(),
            moodle_user_id: None,
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string),
            forename: forename.trim().to_string(),
            surname: surname.trim().to_string(),
            email: email.trim().to_string(),
            status: ContactStatus::Pending,
            staff_comment: None,
            system_comment: String::new(),
            created_at: None,
            updated_at: None,
            approved_at: None,
            synced_at: None,
        })
    }

    /// Returns the contact's display name, including the title when present.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.title.as_ref().map_or_else(
            || format!("{} {}", self.forename, self.surname),
            |title| format!("{title} {} {}", self.forename, self.surname),
        )
    }

    /// Transitions the contact to a new status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the lifecycle
    /// rules forbid the change.
    pub fn set_status(&mut self, new_status: ContactStatus) -> Result<(), DomainError> {
        self.status.validate_transition(new_status)?;
        self.status = new_status;
        Ok(())
    }

    /// Appends one `[timestamp] text` line to the system comment.
    ///
    /// The system comment is the record's audit trail; lines are only ever
    /// appended, never rewritten.
    pub fn append_system_comment_line(&mut self, timestamp: &str, text: &str) {
        if !self.system_comment.is_empty() {
            self.system_comment.push('\n');
        }
        self.system_comment.push('[');
        self.system_comment.push_str(timestamp);
        self.system_comment.push_str("] ");
        self.system_comment.push_str(text);
    }
}
