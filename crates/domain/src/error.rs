// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The status string does not name a known contact status.
    InvalidContactStatus {
        /// The unrecognised status string.
        status: String,
    },
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// The requested de-provision target is not in the de-provisioned subset.
    NotADeprovisionedStatus {
        /// The offending status.
        status: String,
    },
    /// An operation requiring a persisted contact was called without an id.
    MissingContactId,
    /// An operation requiring a pending contact found another status.
    ContactNotPending {
        /// The actual status.
        status: String,
    },
    /// Admissions number is empty or malformed.
    InvalidAdno(String),
    /// E-mail address is empty or malformed.
    InvalidEmail(String),
    /// A name field is empty or invalid.
    InvalidName(String),
    /// MIS record id must be positive.
    InvalidMisId(i64),
    /// External MIS identifier is empty or invalid.
    InvalidExternalMisId(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContactStatus { status } => {
                write!(f, "Invalid contact status: {status}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition {from} -> {to}: {reason}")
            }
            Self::NotADeprovisionedStatus { status } => {
                write!(f, "'{status}' is not a de-provisioned status")
            }
            Self::MissingContactId => {
                write!(f, "Contact has not been persisted (no contact id)")
            }
            Self::ContactNotPending { status } => {
                write!(f, "Contact is not pending (status is '{status}')")
            }
            Self::InvalidAdno(msg) => write!(f, "Invalid admissions number: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid e-mail address: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidMisId(id) => write!(f, "Invalid MIS record id: {id}"),
            Self::InvalidExternalMisId(msg) => {
                write!(f, "Invalid external MIS identifier: {msg}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
