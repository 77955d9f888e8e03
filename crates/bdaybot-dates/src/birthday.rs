// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Projection of a birth date onto the current or next year, and day counts.
//!
//! February 29th projected onto a common year falls on February 28th.

use chrono::{Datelike, NaiveDate};

/// Moves `date` to `year`, clamping February 29th to February 28th.
fn with_year_clamped(date: NaiveDate, year: i32) -> NaiveDate {
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        // Only years outside chrono's range reach this.
        .unwrap_or(date)
}

/// Same month and day as `date`, in the year of `today`.
pub fn set_current_year(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    with_year_clamped(date, today.year())
}

/// Same month and day as `date`, in the year after `today`.
pub fn set_next_year(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    with_year_clamped(date, today.year() + 1)
}

/// Whether the year-adjusted `date` lies strictly before `today`.
///
/// A birthday falling on `today` has not passed.
pub fn has_birthday_passed(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

/// Whole days from `today` to `date`.
///
/// Callers pass a date on or after `today`; earlier dates yield 0.
pub fn get_days_to_next_birth_date(date: NaiveDate, today: NaiveDate) -> u32 {
    u32::try_from((date - today).num_days()).unwrap_or(0)
}

/// Days until the next occurrence of `birth_date`, counting from `today`.
///
/// Uses this year's occurrence unless it already passed, then next year's.
pub fn remaining_days(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    let mut next_birth_date = set_current_year(birth_date, today);
    if has_birthday_passed(next_birth_date, today) {
        next_birth_date = set_next_year(birth_date, today);
    }
    get_days_to_next_birth_date(next_birth_date, today)
}
