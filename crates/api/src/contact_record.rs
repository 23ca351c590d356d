// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The contact provisioning workflow.
//!
//! [`ContactRecord`] wraps a domain [`Contact`] and drives its lifecycle
//! against the persistence layer: load, save, approve onto the
//! provisioning queue, de-provision, delete, and manage the contact's
//! pupil mappings. Mappings are cached per record instance and
//! invalidated by mutation or forced reload.

use crate::error::ApiError;
use crate::now_utc_timestamp;
use crate::password::generate_initial_password;
use guardian_sync_domain::{Adno, Contact, ContactStatus, DomainError};
use guardian_sync_persistence::{MoodleUserRow, Persistence};
use tracing::{debug, info, warn};

/// Name of the setting holding the newline-separated context id list.
pub const STATIC_ROLE_CONTEXTS_SETTING: &str = "static_role_contexts";

/// Role shortname assigned to parents in static contexts.
pub const PARENT_ROLE: &str = "parent";

/// A contact's link to one pupil's Moodle account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMapping {
    pub mapping_id: i64,
    pub contact_id: i64,
    /// The pupil's admissions number.
    pub adno: String,
    /// The pupil's Moodle account.
    pub pupil: MoodleUserRow,
}

/// A contact record plus its workflow state.
///
/// The mapping cache lives here rather than on the domain struct: it is
/// an artefact of how callers iterate a record's pupils repeatedly within
/// one request, not part of the contact's identity.
#[derive(Debug)]
pub struct ContactRecord {
    contact: Contact,
    mappings: Option<Vec<ContactMapping>>,
}

impl ContactRecord {
    /// Wraps an in-memory contact (typically a freshly validated one).
    #[must_use]
    pub const fn new(contact: Contact) -> Self {
        Self {
            contact,
            mappings: None,
        }
    }

    /// Returns the underlying contact.
    #[must_use]
    pub const fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Returns the underlying contact for field edits.
    ///
    /// Prefer the lifecycle operations (or [`Contact::set_status`]) over
    /// assigning `status` directly; direct assignment skips the
    /// transition table.
    pub const fn contact_mut(&mut self) -> &mut Contact {
        &mut self.contact
    }

    /// Loads a record by row id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a non-positive id, or a
    /// persistence error if the lookup fails.
    pub fn load_by_id(
        persistence: &mut Persistence,
        contact_id: i64,
    ) -> Result<Option<Self>, ApiError> {
        if contact_id <= 0 {
            return Err(ApiError::InvalidInput {
                field: "contact_id".to_string(),
                message: format!("contact id must be positive, got {contact_id}"),
            });
        }

        let contact = persistence.get_contact_by_id(contact_id)?;
        Ok(contact.map(Self::new))
    }

    /// Loads a record by external MIS identifier.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for an empty identifier, or a
    /// persistence error if the lookup fails.
    pub fn load_by_external_id(
        persistence: &mut Persistence,
        external_mis_id: &str,
    ) -> Result<Option<Self>, ApiError> {
        if external_mis_id.trim().is_empty() {
            return Err(ApiError::InvalidInput {
                field: "external_mis_id".to_string(),
                message: "external MIS identifier is empty".to_string(),
            });
        }

        let contact = persistence.get_contact_by_external_id(external_mis_id.trim())?;
        Ok(contact.map(Self::new))
    }

    /// Persists the record: insert when it has no id, update otherwise.
    ///
    /// A record inserted here always lands in `pending` status, whatever
    /// its in-memory status was.
    ///
    /// # Returns
    ///
    /// The affected-row count.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(&mut self, persistence: &mut Persistence) -> Result<usize, ApiError> {
        match self.contact.contact_id {
            None => {
                // Not a lifecycle transition: a new row starts pending by
                // definition, so the field is assigned directly.
                self.contact.status = ContactStatus::Pending;
                let contact_id = persistence.insert_contact(&self.contact)?;
                self.contact.contact_id = Some(contact_id);
                Ok(1)
            }
            Some(_) => Ok(persistence.update_contact(&self.contact)?),
        }
    }

    /// Appends a line to the system comment and persists it.
    ///
    /// # Errors
    ///
    /// Fails if the record has never been saved, or if the row has gone
    /// missing underneath us.
    pub fn append_system_comment(
        &mut self,
        persistence: &mut Persistence,
        text: &str,
    ) -> Result<(), ApiError> {
        let contact_id = self.require_contact_id()?;

        self.contact
            .append_system_comment_line(&now_utc_timestamp(), text);

        let rows = persistence.update_system_comment(contact_id, &self.contact.system_comment)?;
        if rows == 0 {
            return Err(ApiError::ResourceNotFound {
                resource_type: "Contact".to_string(),
                message: format!("contact {contact_id}"),
            });
        }
        Ok(())
    }

    /// Approves a pending contact and queues it for provisioning.
    ///
    /// The record must be persisted and in `pending` status. On success
    /// the contact is `approved`, stamped, and a provisioning-queue row
    /// exists for the external cron provisioner.
    ///
    /// If the queue already holds an entry with the same e-mail, the
    /// contact is flipped to `duplicate` instead and
    /// [`ApiError::DuplicateQueueEntry`] is returned so callers can
    /// surface it distinctly.
    ///
    /// # Returns
    ///
    /// The id of the created queue entry.
    ///
    /// # Errors
    ///
    /// See above; also fails on any underlying persistence error.
    pub fn approve_for_provisioning(
        &mut self,
        persistence: &mut Persistence,
    ) -> Result<i64, ApiError> {
        let contact_id = self.require_contact_id()?;

        if self.contact.status != ContactStatus::Pending {
            return Err(DomainError::ContactNotPending {
                status: self.contact.status.as_str().to_string(),
            }
            .into());
        }

        info!(contact_id, email = %self.contact.email, "Approving contact for provisioning");

        let now = now_utc_timestamp();
        self.contact
            .append_system_comment_line(&now, "Approved for provisioning");
        self.contact.set_status(ContactStatus::Approved)?;
        self.contact.approved_at = Some(now.clone());
        persistence.update_contact(&self.contact)?;

        // The lookup and the insert below are separate statements; two
        // concurrent approvals for the same e-mail can both pass the
        // check. The duplicate status is the recovery path either way.
        if let Some(entry) = persistence.find_queue_entry_by_email(&self.contact.email)? {
            warn!(
                contact_id,
                queue_id = entry.queue_id,
                other_contact_id = entry.contact_id,
                "Provisioning queue already holds this e-mail"
            );
            self.contact.append_system_comment_line(
                &now_utc_timestamp(),
                &format!(
                    "Duplicate of queued request for contact {}; marked duplicate",
                    entry.contact_id
                ),
            );
            self.contact.set_status(ContactStatus::Duplicate)?;
            persistence.update_contact(&self.contact)?;
            return Err(ApiError::DuplicateQueueEntry {
                email: self.contact.email.clone(),
            });
        }

        let username = derive_username(&self.contact);
        let initial_password = generate_initial_password();
        let queue_id = persistence.enqueue_provisioning(
            contact_id,
            &self.contact.email,
            &username,
            &initial_password,
        )?;

        info!(contact_id, queue_id, "Contact queued for provisioning");
        Ok(queue_id)
    }

    /// De-provisions the contact into one of the de-provisioned statuses.
    ///
    /// The target must be in the de-provisioned subset and reachable from
    /// the current status; both checks run before any row is touched.
    /// The queue entry is then removed (zero rows removed is an error),
    /// an audit line is appended, and the new status is persisted.
    ///
    /// # Errors
    ///
    /// See above; also fails on any underlying persistence error.
    pub fn deprovision(
        &mut self,
        persistence: &mut Persistence,
        target: ContactStatus,
    ) -> Result<(), ApiError> {
        let contact_id = self.require_contact_id()?;

        if !target.is_deprovisioned() {
            return Err(DomainError::NotADeprovisionedStatus {
                status: target.as_str().to_string(),
            }
            .into());
        }
        self.contact.status.validate_transition(target)?;

        info!(contact_id, target = target.as_str(), "De-provisioning contact");

        let rows = persistence.delete_queue_entry_for_contact(contact_id)?;
        if rows == 0 {
            return Err(ApiError::QueueEntryNotFound { contact_id });
        }

        self.contact.append_system_comment_line(
            &now_utc_timestamp(),
            &format!("De-provisioned to '{target}'"),
        );
        self.contact.set_status(target)?;
        persistence.update_contact(&self.contact)?;
        Ok(())
    }

    /// Returns the contact's pupil mappings.
    ///
    /// Serves the instance cache unless it is empty or `force_reload` is
    /// set. A reload re-queries the mapping rows and resolves each
    /// pupil's Moodle account; mappings whose pupil no longer exists are
    /// logged and skipped, not propagated.
    ///
    /// # Errors
    ///
    /// Fails if the record has never been saved or a query fails.
    pub fn contact_mappings(
        &mut self,
        persistence: &mut Persistence,
        force_reload: bool,
    ) -> Result<&[ContactMapping], ApiError> {
        if force_reload || self.mappings.is_none() {
            let loaded = self.load_mappings(persistence)?;
            self.mappings = Some(loaded);
        }
        Ok(self.mappings.as_deref().unwrap_or_default())
    }

    /// Links the contact to a pupil by admissions number.
    ///
    /// # Returns
    ///
    /// The id of the created mapping row.
    ///
    /// # Errors
    ///
    /// Fails if no pupil account carries the adno, the pair is already
    /// mapped, or the record has never been saved.
    pub fn add_mapping_by_adno(
        &mut self,
        persistence: &mut Persistence,
        adno: &Adno,
    ) -> Result<i64, ApiError> {
        let contact_id = self.require_contact_id()?;

        let pupil = persistence
            .get_moodle_user_by_adno(adno.value())?
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: "Moodle user".to_string(),
                message: format!("no pupil account with adno {adno}"),
            })?;

        let mapping_id = persistence.insert_contact_mapping(
            contact_id,
            adno.value(),
            pupil.moodle_user_id,
        )?;

        self.mappings = None;
        Ok(mapping_id)
    }

    /// Removes the contact's mapping for an admissions number.
    ///
    /// # Errors
    ///
    /// Fails if no such mapping exists or the record has never been saved.
    pub fn remove_mapping_by_adno(
        &mut self,
        persistence: &mut Persistence,
        adno: &Adno,
    ) -> Result<(), ApiError> {
        let contact_id = self.require_contact_id()?;

        let rows = persistence.delete_mapping_by_adno(contact_id, adno.value())?;
        if rows == 0 {
            return Err(ApiError::ResourceNotFound {
                resource_type: "Contact mapping".to_string(),
                message: format!("contact {contact_id} has no mapping for adno {adno}"),
            });
        }

        self.mappings = None;
        Ok(())
    }

    /// Deletes the contact row entirely.
    ///
    /// Refuses while pupil mappings exist or while the account is still
    /// provisioned and enabled.
    ///
    /// # Errors
    ///
    /// See above; also fails on any underlying persistence error.
    pub fn delete(&mut self, persistence: &mut Persistence) -> Result<(), ApiError> {
        let contact_id = self.require_contact_id()?;

        let count = persistence.count_mappings_for_contact(contact_id)?;
        if count > 0 {
            return Err(ApiError::MappingsStillPresent { contact_id, count });
        }

        if self.is_provisioned_and_enabled(persistence)? {
            return Err(ApiError::AccountStillEnabled { contact_id });
        }

        persistence.delete_contact(contact_id)?;
        self.contact.contact_id = None;
        self.mappings = None;
        Ok(())
    }

    /// Whether the contact currently holds a live Moodle account.
    ///
    /// True if a Moodle user with this e-mail exists and is not
    /// suspended, or if the status is `approved` or `provisioned`.
    ///
    /// # Errors
    ///
    /// Fails if the Moodle user lookup fails.
    pub fn is_provisioned_and_enabled(
        &self,
        persistence: &mut Persistence,
    ) -> Result<bool, ApiError> {
        if let Some(user) = persistence.get_moodle_user_by_email(&self.contact.email)? {
            if !user.suspended() {
                return Ok(true);
            }
        }

        Ok(matches!(
            self.contact.status,
            ContactStatus::Approved | ContactStatus::Provisioned
        ))
    }

    /// Ensures the contact's Moodle user holds the parent role in every
    /// statically configured context.
    ///
    /// Context ids come from the `static_role_contexts` setting, one per
    /// line; malformed lines are logged and skipped. Stamps `synced_at`.
    ///
    /// # Returns
    ///
    /// The number of role assignments created.
    ///
    /// # Errors
    ///
    /// Fails if the contact has no linked Moodle account, has never been
    /// saved, or a persistence operation fails.
    pub fn add_role_in_static_contexts(
        &mut self,
        persistence: &mut Persistence,
    ) -> Result<usize, ApiError> {
        self.require_contact_id()?;
        let moodle_user_id =
            self.contact
                .moodle_user_id
                .ok_or_else(|| ApiError::InvalidInput {
                    field: "moodle_user_id".to_string(),
                    message: "contact has no linked Moodle account".to_string(),
                })?;

        let raw = persistence
            .get_setting(STATIC_ROLE_CONTEXTS_SETTING)?
            .unwrap_or_default();

        let mut created = 0;
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<i64>() {
                Ok(context_id) => {
                    if persistence.ensure_role_assignment(moodle_user_id, context_id, PARENT_ROLE)? {
                        created += 1;
                    }
                }
                Err(_) => {
                    warn!(line, "Skipping malformed context id in {STATIC_ROLE_CONTEXTS_SETTING}");
                }
            }
        }

        self.contact.synced_at = Some(now_utc_timestamp());
        persistence.update_contact(&self.contact)?;

        debug!(moodle_user_id, created, "Static-context role sync complete");
        Ok(created)
    }

    fn require_contact_id(&self) -> Result<i64, ApiError> {
        self.contact
            .contact_id
            .ok_or_else(|| DomainError::MissingContactId.into())
    }

    fn load_mappings(
        &self,
        persistence: &mut Persistence,
    ) -> Result<Vec<ContactMapping>, ApiError> {
        let contact_id = self.require_contact_id()?;

        let rows = persistence.list_mappings_for_contact(contact_id)?;
        let mut mappings = Vec::with_capacity(rows.len());
        for row in rows {
            match persistence.get_moodle_user_by_id(row.pupil_moodle_user_id)? {
                Some(pupil) => mappings.push(ContactMapping {
                    mapping_id: row.mapping_id,
                    contact_id: row.contact_id,
                    adno: row.adno,
                    pupil,
                }),
                None => {
                    warn!(
                        mapping_id = row.mapping_id,
                        adno = %row.adno,
                        "Skipping mapping whose pupil account no longer exists"
                    );
                }
            }
        }
        Ok(mappings)
    }
}

/// Derives the queue-entry username from the contact's name and id.
///
/// `forename.surname` lowercased with non-alphanumerics stripped, plus
/// the contact id for uniqueness (e.g. `jane.doe.42`).
fn derive_username(contact: &Contact) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase()
    };

    let contact_id = contact.contact_id.unwrap_or_default();
    format!(
        "{}.{}.{contact_id}",
        clean(&contact.forename),
        clean(&contact.surname)
    )
}
