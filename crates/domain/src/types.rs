// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A pupil's admissions number.
///
/// The adno is the MIS's identifier for a pupil and is how a contact is
/// linked to a pupil's Moodle account. Adnos are normalized to uppercase
/// so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Adno {
    value: String,
}

impl Adno {
    /// Creates a new `Adno`, trimming and uppercasing the input.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAdno` if the input is empty after
    /// trimming or contains characters other than ASCII letters and digits.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidAdno(
                "admissions number is empty".to_string(),
            ));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidAdno(format!(
                "'{trimmed}' contains non-alphanumeric characters"
            )));
        }
        Ok(Self {
            value: trimmed.to_uppercase(),
        })
    }

    /// Returns the normalized adno value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Adno {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
