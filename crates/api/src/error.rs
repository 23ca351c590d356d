// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the workflow boundary layer.

use guardian_sync_domain::DomainError;
use guardian_sync_persistence::PersistenceError;

/// Workflow-level errors.
///
/// These are distinct from domain/persistence errors and represent the
/// contract callers program against. `DuplicateQueueEntry` is its own
/// variant so callers can special-case a duplicate e-mail on approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The provisioning queue already holds an entry with this e-mail.
    DuplicateQueueEntry {
        /// The e-mail address both requests share.
        email: String,
    },
    /// The contact still has pupil mappings attached.
    MappingsStillPresent {
        /// The contact id.
        contact_id: i64,
        /// How many mappings are attached.
        count: i64,
    },
    /// The contact's Moodle account is still provisioned and enabled.
    AccountStillEnabled {
        /// The contact id.
        contact_id: i64,
    },
    /// No provisioning-queue entry existed to remove.
    QueueEntryNotFound {
        /// The contact id.
        contact_id: i64,
    },
    /// The uploaded CSV is structurally invalid.
    InvalidCsvFormat {
        /// Why the CSV was rejected.
        reason: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::DuplicateQueueEntry { email } => {
                write!(
                    f,
                    "A provisioning-queue entry already exists for e-mail '{email}'"
                )
            }
            Self::MappingsStillPresent { contact_id, count } => {
                write!(
                    f,
                    "Contact {contact_id} still has {count} pupil mapping(s) attached"
                )
            }
            Self::AccountStillEnabled { contact_id } => {
                write!(
                    f,
                    "Contact {contact_id} still has a provisioned, enabled account"
                )
            }
            Self::QueueEntryNotFound { contact_id } => {
                write!(f, "No provisioning-queue entry for contact {contact_id}")
            }
            Self::InvalidCsvFormat { reason } => write!(f, "Invalid CSV: {reason}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingContactId => Self::InvalidInput {
                field: "contact_id".to_string(),
                message: err.to_string(),
            },
            DomainError::ContactNotPending { .. } | DomainError::InvalidStatusTransition { .. } => {
                Self::DomainRuleViolation {
                    rule: "contact_lifecycle".to_string(),
                    message: err.to_string(),
                }
            }
            DomainError::NotADeprovisionedStatus { .. } => Self::DomainRuleViolation {
                rule: "deprovision_target".to_string(),
                message: err.to_string(),
            },
            DomainError::InvalidAdno(_) => Self::InvalidInput {
                field: "adno".to_string(),
                message: err.to_string(),
            },
            _ => Self::DomainRuleViolation {
                rule: "contact_validation".to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::ContactNotFound(id) => Self::ResourceNotFound {
                resource_type: "Contact".to_string(),
                message: format!("contact {id}"),
            },
            PersistenceError::QueueEntryNotFound { contact_id } => {
                Self::QueueEntryNotFound { contact_id }
            }
            PersistenceError::MoodleUserNotFound(msg) => Self::ResourceNotFound {
                resource_type: "Moodle user".to_string(),
                message: msg,
            },
            _ => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}
