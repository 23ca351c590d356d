// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contact status tracking and transition logic.
//!
//! This module defines the provisioning lifecycle states for a contact and
//! the single transition table that governs movement between them. Every
//! status change anywhere in the system goes through
//! [`ContactStatus::validate_transition`]; no operation carries its own
//! ad hoc status conditionals.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states for a parent account-provisioning request.
///
/// A contact enters the system as `Pending`, is approved by school staff,
/// and is then picked up by the external cron provisioner. The
/// de-provisioned subset (`Pending`, `Rejected`, `Duplicate`, `Bogus`,
/// `Unknown`, `Deleting`) marks requests that must not hold a row on the
/// provisioning queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Awaiting staff review; the state every new record is created in.
    Pending,
    /// Approved by staff and queued for the external provisioner.
    Approved,
    /// The provisioner has created the Moodle account.
    Provisioned,
    /// Another request with the same e-mail was already queued.
    Duplicate,
    /// Rejected by staff.
    Rejected,
    /// The MIS record is known to be bad data.
    Bogus,
    /// The request's origin could not be determined.
    Unknown,
    /// Marked for removal.
    Deleting,
}

impl ContactStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Provisioned => "provisioned",
            Self::Duplicate => "duplicate",
            Self::Rejected => "rejected",
            Self::Bogus => "bogus",
            Self::Unknown => "unknown",
            Self::Deleting => "deleting",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidContactStatus` if the string is not a
    /// valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "provisioned" => Ok(Self::Provisioned),
            "duplicate" => Ok(Self::Duplicate),
            "rejected" => Ok(Self::Rejected),
            "bogus" => Ok(Self::Bogus),
            "unknown" => Ok(Self::Unknown),
            "deleting" => Ok(Self::Deleting),
            _ => Err(DomainError::InvalidContactStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status belongs to the de-provisioned subset.
    ///
    /// A contact in one of these states must not have a row on the
    /// provisioning queue; `deprovision` may only target these states.
    #[must_use]
    pub const fn is_deprovisioned(&self) -> bool {
        matches!(
            self,
            Self::Pending
                | Self::Rejected
                | Self::Duplicate
                | Self::Bogus
                | Self::Unknown
                | Self::Deleting
        )
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        // Deleting is terminal
        if *self == Self::Deleting {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition out of deleting".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(
                new_status,
                Self::Approved
                    | Self::Rejected
                    | Self::Duplicate
                    | Self::Bogus
                    | Self::Unknown
                    | Self::Deleting
            ),
            // Approved and provisioned accounts may be de-provisioned into
            // any member of the subset; approved additionally advances to
            // provisioned once the cron provisioner has run.
            Self::Approved | Self::Provisioned => {
                new_status == Self::Provisioned || new_status.is_deprovisioned()
            }
            // A parked request can be re-submitted or marked for removal.
            Self::Rejected | Self::Duplicate | Self::Bogus | Self::Unknown => {
                matches!(new_status, Self::Pending | Self::Deleting)
            }
            Self::Deleting => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by status lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for ContactStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
