// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User lookups and conversation state transitions.

use bdaybot_core::{BotError, ConversationState, User, UserId};
use chrono::NaiveDate;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::UserRow;

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Get a user by ID.
pub async fn get_user(db: &Database, user_id: &UserId) -> Result<Option<User>, BotError> {
    let id = user_id.as_str().to_string();
    let row = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM users WHERE id = ?1",
                UserRow::COLUMNS
            ))?;
            match stmt.query_row(params![id], UserRow::from_row) {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)?;
    row.map(User::try_from).transpose()
}

/// List all users, most recently updated first.
pub async fn list_users(db: &Database) -> Result<Vec<User>, BotError> {
    let rows = db
        .connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM users ORDER BY updated_at DESC, id",
                UserRow::COLUMNS
            ))?;
            let rows = stmt.query_map([], UserRow::from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)?;
    rows.into_iter().map(User::try_from).collect()
}

/// Create the user if missing and move them to `Greeted`.
pub async fn upsert_greeted(db: &Database, user_id: &UserId) -> Result<(), BotError> {
    let id = user_id.as_str().to_string();
    let state = ConversationState::Greeted.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO users (id, state) VALUES (?1, ?2)
                     ON CONFLICT(id) DO UPDATE SET state = excluded.state, updated_at = {NOW}"
                ),
                params![id, state],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Store the name and move the user to `NameKnown`.
pub async fn set_name(db: &Database, user_id: &UserId, name: &str) -> Result<(), BotError> {
    let id = user_id.as_str().to_string();
    let name = name.to_string();
    let state = ConversationState::NameKnown.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                &format!("UPDATE users SET name = ?2, state = ?3, updated_at = {NOW} WHERE id = ?1"),
                params![id, name, state],
            )
        })
        .await
        .map_err(map_tr_err)?;
    expect_one(changed, user_id)
}

/// Store the birth date and move the user to `BirthDateKnown`.
pub async fn set_birth_date(
    db: &Database,
    user_id: &UserId,
    birth_date: NaiveDate,
) -> Result<(), BotError> {
    let id = user_id.as_str().to_string();
    let birth_date = birth_date.format(bdaybot_dates::DATE_FORMAT).to_string();
    let state = ConversationState::BirthDateKnown.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "UPDATE users SET birth_date = ?2, state = ?3, updated_at = {NOW} WHERE id = ?1"
                ),
                params![id, birth_date, state],
            )
        })
        .await
        .map_err(map_tr_err)?;
    expect_one(changed, user_id)
}

/// Move the user back to `Initial`. Name and birth date are kept.
pub async fn reset_state(db: &Database, user_id: &UserId) -> Result<(), BotError> {
    let id = user_id.as_str().to_string();
    let state = ConversationState::Initial.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                &format!("UPDATE users SET state = ?2, updated_at = {NOW} WHERE id = ?1"),
                params![id, state],
            )
        })
        .await
        .map_err(map_tr_err)?;
    expect_one(changed, user_id)
}

fn expect_one(changed: usize, user_id: &UserId) -> Result<(), BotError> {
    if changed == 0 {
        return Err(BotError::UserNotFound {
            user_id: user_id.to_string(),
        });
    }
    Ok(())
}
