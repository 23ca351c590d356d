// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow boundary layer for Guardian Sync.
//!
//! This crate drives the contact provisioning lifecycle over the
//! persistence layer: loading and saving contact records, approving them
//! onto the provisioning queue, de-provisioning, managing contact/pupil
//! mappings, synchronising parent roles into statically configured
//! contexts, and importing MIS CSV exports.
//!
//! Everything here is synchronous and single-threaded; one operation maps
//! to one or more SQL statements executed immediately.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod contact_record;
mod csv_import;
mod error;
mod password;

#[cfg(test)]
mod tests;

pub use contact_record::{
    ContactMapping, ContactRecord, PARENT_ROLE, STATIC_ROLE_CONTEXTS_SETTING,
};
pub use csv_import::{
    CsvImportResult, CsvPreviewResult, CsvRowResult, CsvRowStatus, import_csv, preview_csv,
};
pub use error::ApiError;
pub use password::{PasswordPolicyError, generate_initial_password, validate_initial_password};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Formats the current UTC instant as an RFC 3339 timestamp.
///
/// Used for system-comment audit lines and the approved/synced stamps.
#[must_use]
pub(crate) fn now_utc_timestamp() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc().unix_timestamp().to_string())
}
