// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field validation for contact records.
//!
//! MIS exports are messy; these checks catch the structurally broken
//! values (empty names, e-mail addresses with no mailbox or domain part)
//! before a record is accepted. They deliberately stop short of full
//! RFC 5322 address validation.

use crate::error::DomainError;

/// Validates an e-mail address.
///
/// Requires exactly one `@` with a non-empty mailbox part, a domain part
/// containing a dot, and no whitespace anywhere.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` describing the first failed check.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() {
        return Err(DomainError::InvalidEmail(
            "e-mail address is empty".to_string(),
        ));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' contains whitespace"
        )));
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' must contain exactly one '@'"
        )));
    };
    if local.is_empty() {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' has an empty mailbox part"
        )));
    }
    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') {
        return Err(DomainError::InvalidEmail(format!(
            "'{email}' has an invalid domain part"
        )));
    }
    Ok(())
}

/// Validates a name field (forename or surname).
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the value is empty after trimming.
pub fn validate_name(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidName(format!("{field} is empty")));
    }
    Ok(())
}

/// Validates the identity fields of a contact record.
///
/// # Errors
///
/// Returns the first `DomainError` encountered: invalid MIS id, empty
/// external id, empty name, or malformed e-mail.
pub fn validate_contact_fields(
    mis_id: i64,
    external_mis_id: &str,
    forename: &str,
    surname: &str,
    email: &str,
) -> Result<(), DomainError> {
    if mis_id <= 0 {
        return Err(DomainError::InvalidMisId(mis_id));
    }
    if external_mis_id.trim().is_empty() {
        return Err(DomainError::InvalidExternalMisId(
            "external MIS identifier is empty".to_string(),
        ));
    }
    validate_name("forename", forename)?;
    validate_name("surname", surname)?;
    validate_email(email)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("parent@example.org").is_ok());
        assert!(validate_email("first.last@school.ac.uk").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.org").is_err());
        assert!(validate_email("parent@").is_err());
        assert!(validate_email("parent@nodot").is_err());
        assert!(validate_email("two@@example.org").is_err());
        assert!(validate_email("spaced out@example.org").is_err());
    }

    #[test]
    fn test_validate_contact_fields() {
        assert!(
            validate_contact_fields(7, "A5F0-22", "Jane", "Doe", "jane.doe@example.org").is_ok()
        );
        assert!(validate_contact_fields(0, "A5F0-22", "Jane", "Doe", "x@y.org").is_err());
        assert!(validate_contact_fields(7, "  ", "Jane", "Doe", "x@y.org").is_err());
        assert!(validate_contact_fields(7, "A5F0-22", "", "Doe", "x@y.org").is_err());
        assert!(validate_contact_fields(7, "A5F0-22", "Jane", "Doe", "bad").is_err());
    }
}
