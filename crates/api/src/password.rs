// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Initial-password generation for provisioning-queue entries.
//!
//! The cron provisioner creates the Moodle account with a one-time
//! password, which Moodle then forces the parent to change on first
//! login. Generated passwords satisfy Moodle's default site policy
//! (length plus all four character classes), checked by
//! [`validate_initial_password`].

use rand::RngExt;
use thiserror::Error;

/// Generated password length.
const PASSWORD_LENGTH: usize = 16;

const UPPERCASE: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghjkmnpqrstuvwxyz";
const DIGITS: &[u8] = b"23456789";
const SYMBOLS: &[u8] = b"!#$%&*+-=?@_";

/// Initial-password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password lacks a required character class.
    #[error("Password must contain at least one {class} character")]
    MissingCharacterClass { class: &'static str },
}

/// Validates a password against the provisioning policy.
///
/// # Errors
///
/// Returns a `PasswordPolicyError` for the first failed requirement.
pub fn validate_initial_password(password: &str) -> Result<(), PasswordPolicyError> {
    if password.len() < PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min_length: PASSWORD_LENGTH,
        });
    }

    let classes: [(&[u8], &'static str); 4] = [
        (UPPERCASE, "uppercase"),
        (LOWERCASE, "lowercase"),
        (DIGITS, "digit"),
        (SYMBOLS, "symbol"),
    ];

    for (alphabet, class) in classes {
        if !password.bytes().any(|b| alphabet.contains(&b)) {
            return Err(PasswordPolicyError::MissingCharacterClass { class });
        }
    }

    Ok(())
}

/// Generates an initial password satisfying the provisioning policy.
///
/// One character from each class is inserted at a random position into a
/// random tail, so every class is always present. Visually ambiguous
/// characters (I, l, O, 0, 1) are excluded from the alphabets.
#[must_use]
pub fn generate_initial_password() -> String {
    let mut rng = rand::rng();

    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

    let mut password: Vec<u8> = (0..PASSWORD_LENGTH - 4)
        .map(|_| all[rng.random_range(0..all.len())])
        .collect();

    for alphabet in [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS] {
        let c = alphabet[rng.random_range(0..alphabet.len())];
        let position = rng.random_range(0..=password.len());
        password.insert(position, c);
    }

    String::from_utf8(password).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_satisfies_policy() {
        for _ in 0..100 {
            let password = generate_initial_password();
            assert_eq!(password.len(), PASSWORD_LENGTH);
            validate_initial_password(&password).unwrap();
        }
    }

    #[test]
    fn test_too_short_rejected() {
        assert_eq!(
            validate_initial_password("Aa2!"),
            Err(PasswordPolicyError::TooShort { min_length: 16 })
        );
    }

    #[test]
    fn test_missing_class_rejected() {
        // Long enough, but no symbol
        let result = validate_initial_password("Aabcdefgh23456789");
        assert_eq!(
            result,
            Err(PasswordPolicyError::MissingCharacterClass { class: "symbol" })
        );

        // No digit
        let result = validate_initial_password("Aabcdefghijk@@@@@");
        assert_eq!(
            result,
            Err(PasswordPolicyError::MissingCharacterClass { class: "digit" })
        );
    }

    #[test]
    fn test_generated_passwords_differ() {
        let first = generate_initial_password();
        let second = generate_initial_password();
        assert_ne!(first, second);
    }
}
