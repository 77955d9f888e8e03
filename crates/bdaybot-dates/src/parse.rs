// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Birth date parsing and validation.

use chrono::NaiveDate;
use thiserror::Error;

/// Accepted input format for birth dates (`1990-05-20`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced while parsing a birth date.
#[derive(Debug, Error)]
pub enum DateError {
    /// The text is not a real calendar date in [`DATE_FORMAT`].
    #[error("`{input}` is not a valid date (expected YYYY-MM-DD): {source}")]
    Malformed {
        input: String,
        source: chrono::ParseError,
    },
}

/// Parses `text` as a calendar date in [`DATE_FORMAT`].
///
/// Surrounding whitespace is ignored. Dates that match the shape but do not
/// exist (April 31st, February 29th of a common year) are rejected.
pub fn parse_birth_date(text: &str) -> Result<NaiveDate, DateError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|source| DateError::Malformed {
        input: trimmed.to_string(),
        source,
    })
}

/// Returns `true` iff `text` parses as a real calendar date.
pub fn is_date_valid(text: &str) -> bool {
    parse_birth_date(text).is_ok()
}
