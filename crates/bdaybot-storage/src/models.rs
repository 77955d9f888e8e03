// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the `users` table and their conversion into domain types.
//!
//! SQLite stores the state as snake_case text and the birth date as
//! `YYYY-MM-DD`; both are parsed back here so that a corrupted row surfaces
//! as a storage error instead of a silently wrong conversation.

use std::str::FromStr;

use bdaybot_core::{BotError, ConversationState, User, UserId};
use chrono::NaiveDate;

/// Raw `users` row as read from SQLite.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub state: String,
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRow {
    /// Column list matching the field order of [`UserRow::from_row`].
    pub const COLUMNS: &'static str = "id, state, name, birth_date, created_at, updated_at";

    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            state: row.get(1)?,
            name: row.get(2)?,
            birth_date: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = BotError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let state = ConversationState::from_str(&row.state).map_err(|_| BotError::Storage {
            source: format!("user {} has unknown state `{}`", row.id, row.state).into(),
        })?;
        let birth_date = row
            .birth_date
            .as_deref()
            .map(|text| NaiveDate::parse_from_str(text, bdaybot_dates::DATE_FORMAT))
            .transpose()
            .map_err(BotError::storage)?;

        Ok(User {
            id: UserId(row.id),
            state,
            name: row.name,
            birth_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(state: &str, birth_date: Option<&str>) -> UserRow {
        UserRow {
            id: "U1".into(),
            state: state.into(),
            name: Some("Alex".into()),
            birth_date: birth_date.map(str::to_string),
            created_at: "2026-10-18T00:00:00.000Z".into(),
            updated_at: "2026-10-18T00:00:00.000Z".into(),
        }
    }

    #[test]
    fn converts_complete_row() {
        let user = User::try_from(row("birth_date_known", Some("1990-05-20"))).unwrap();
        assert_eq!(user.state, ConversationState::BirthDateKnown);
        assert_eq!(user.birth_date, NaiveDate::from_ymd_opt(1990, 5, 20));
        assert_eq!(user.name.as_deref(), Some("Alex"));
    }

    #[test]
    fn unknown_state_is_storage_error() {
        let err = User::try_from(row("sleeping", None)).unwrap_err();
        assert!(matches!(err, BotError::Storage { .. }));
    }

    #[test]
    fn corrupt_birth_date_is_storage_error() {
        let err = User::try_from(row("name_known", Some("20/05/1990"))).unwrap_err();
        assert!(matches!(err, BotError::Storage { .. }));
    }
}
