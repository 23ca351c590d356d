// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MIS CSV preview and import.
//!
//! Schools export parent contact data from their MIS as CSV. This module
//! parses and validates an export without mutating state (`preview_csv`)
//! and inserts pending contacts for valid rows (`import_csv`). Rows whose
//! external MIS identifier is already present are skipped, so re-running
//! an import is harmless.

use csv::StringRecord;
use guardian_sync_domain::Contact;
use guardian_sync_persistence::Persistence;
use std::collections::HashMap;
use std::io::Read;
use tracing::info;

use crate::contact_record::ContactRecord;
use crate::error::ApiError;

/// A single row result from CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRowResult {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// The parsed external MIS identifier (if present).
    pub external_mis_id: Option<String>,
    /// The parsed e-mail (if present).
    pub email: Option<String>,
    /// The row status.
    pub status: CsvRowStatus,
    /// Zero or more validation errors.
    pub errors: Vec<String>,
}

/// Status of a CSV row validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvRowStatus {
    /// Row is valid and can be imported.
    Valid,
    /// Row has validation errors and cannot be imported.
    Invalid,
}

/// Result of CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPreviewResult {
    /// Per-row validation results.
    pub rows: Vec<CsvRowResult>,
    /// Total number of rows.
    pub total_rows: usize,
    /// Number of valid rows.
    pub valid_count: usize,
    /// Number of invalid rows.
    pub invalid_count: usize,
}

/// Result of a CSV import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImportResult {
    /// Contacts inserted as `pending`.
    pub imported: usize,
    /// Rows skipped because their external MIS id already exists.
    pub skipped_existing: usize,
    /// Rows skipped because they failed validation.
    pub invalid: usize,
}

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &["mis_id", "external_mis_id", "forename", "surname", "email"];

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();

    for (idx, header) in headers.iter().enumerate() {
        header_map.insert(normalize_header(header), idx);
    }

    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .filter(|required| !header_map.contains_key(**required))
        .map(ToString::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidCsvFormat {
            reason: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// Parses a CSV row into a `Contact` if possible.
///
/// Returns `Ok(Contact)` if all fields are valid, or `Err(Vec<String>)`
/// with error messages.
fn parse_csv_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<Contact, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut require = |name: &str| -> String {
        get_field(name).unwrap_or_else(|| {
            errors.push(format!("{name}: required field is missing or empty"));
            String::new()
        })
    };

    let mis_id_str = require("mis_id");
    let external_mis_id = require("external_mis_id");
    let forename = require("forename");
    let surname = require("surname");
    let email = require("email");
    let title = get_field("title");

    let mis_id: i64 = match mis_id_str.parse::<i64>() {
        Ok(id) => id,
        Err(_) if mis_id_str.is_empty() => 0,
        Err(_) => {
            errors.push(format!("mis_id: invalid number '{mis_id_str}'"));
            0
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Contact::new(
        mis_id,
        &external_mis_id,
        title.as_deref(),
        &forename,
        &surname,
        &email,
    )
    .map_err(|e| vec![e.to_string()])
}

/// Validates an MIS CSV export without persisting anything.
///
/// # Errors
///
/// Returns `ApiError::InvalidCsvFormat` if the header row is missing or
/// incomplete, or if the CSV cannot be read at all. Per-row problems are
/// reported in the result, not as errors.
pub fn preview_csv<R: Read>(reader: R) -> Result<CsvPreviewResult, ApiError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read header row: {e}"),
        })?
        .clone();
    let header_map = validate_headers(&headers)?;

    let mut rows: Vec<CsvRowResult> = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let row_number = idx + 1;
        match record {
            Ok(record) => {
                let get = |name: &str| -> Option<String> {
                    header_map
                        .get(name)
                        .and_then(|&i| record.get(i))
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                };
                let external_mis_id = get("external_mis_id");
                let email = get("email");

                match parse_csv_row(&record, &header_map) {
                    Ok(_) => rows.push(CsvRowResult {
                        row_number,
                        external_mis_id,
                        email,
                        status: CsvRowStatus::Valid,
                        errors: Vec::new(),
                    }),
                    Err(errors) => rows.push(CsvRowResult {
                        row_number,
                        external_mis_id,
                        email,
                        status: CsvRowStatus::Invalid,
                        errors,
                    }),
                }
            }
            Err(e) => rows.push(CsvRowResult {
                row_number,
                external_mis_id: None,
                email: None,
                status: CsvRowStatus::Invalid,
                errors: vec![format!("unreadable row: {e}")],
            }),
        }
    }

    let total_rows = rows.len();
    let valid_count = rows
        .iter()
        .filter(|r| r.status == CsvRowStatus::Valid)
        .count();

    Ok(CsvPreviewResult {
        total_rows,
        valid_count,
        invalid_count: total_rows - valid_count,
        rows,
    })
}

/// Imports an MIS CSV export, inserting a pending contact per valid row.
///
/// Rows whose external MIS identifier already exists are counted as
/// skipped; invalid rows are counted and left alone.
///
/// # Errors
///
/// Returns `ApiError::InvalidCsvFormat` for structural CSV problems, or a
/// persistence error if an insert fails.
pub fn import_csv<R: Read>(
    persistence: &mut Persistence,
    reader: R,
) -> Result<CsvImportResult, ApiError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read header row: {e}"),
        })?
        .clone();
    let header_map = validate_headers(&headers)?;

    let mut result = CsvImportResult {
        imported: 0,
        skipped_existing: 0,
        invalid: 0,
    };

    for record in csv_reader.records() {
        let Ok(record) = record else {
            result.invalid += 1;
            continue;
        };

        let Ok(contact) = parse_csv_row(&record, &header_map) else {
            result.invalid += 1;
            continue;
        };

        if persistence
            .get_contact_by_external_id(&contact.external_mis_id)?
            .is_some()
        {
            result.skipped_existing += 1;
            continue;
        }

        let mut record = ContactRecord::new(contact);
        record.save(persistence)?;
        result.imported += 1;
    }

    info!(
        imported = result.imported,
        skipped_existing = result.skipped_existing,
        invalid = result.invalid,
        "MIS CSV import complete"
    );
    Ok(result)
}
