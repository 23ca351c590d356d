// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for Guardian Sync.
//!
//! Guardian Sync provisions Moodle accounts for parents ("contacts")
//! sourced from a school Management Information System. This crate holds
//! the pure domain model: the contact record, its status lifecycle, and
//! field validation. Nothing in here touches a database.

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

mod contact;
mod error;
mod status;
mod types;
mod validation;

pub use contact::Contact;
pub use error::DomainError;
pub use status::ContactStatus;
pub use types::Adno;
pub use validation::{validate_contact_fields, validate_email, validate_name};
