// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar arithmetic for birth dates.
//!
//! Everything here is pure: "now" is passed in as a `today` date, usually
//! obtained from a [`Clock`]. Time of day never participates in a comparison.

pub mod birthday;
pub mod clock;
pub mod parse;

pub use birthday::{
    get_days_to_next_birth_date, has_birthday_passed, remaining_days, set_current_year,
    set_next_year,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use parse::{DateError, DATE_FORMAT, is_date_valid, parse_birth_date};
