// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User store trait for persistence backends (SQLite, in-memory).

use async_trait::async_trait;

use crate::error::BotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{User, UserId};

/// Persistence of user records and their conversation state.
///
/// Every mutating operation is a named transition of the conversation state
/// machine. Implementations are not required to enforce transition order; the
/// conversation engine is the only writer and calls them in sequence.
#[async_trait]
pub trait UserStore: PluginAdapter {
    /// Initializes the backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), BotError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), BotError>;

    /// Looks up a user record; `None` for a contact never seen before.
    async fn get_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, BotError>;

    /// Creates the record if absent and moves it to `Greeted`.
    async fn set_greetings_received_state(&self, user_id: &UserId) -> Result<(), BotError>;

    /// Stores the user's name and moves the record to `NameKnown`.
    async fn set_user_name_and_upgrade_state(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<(), BotError>;

    /// Parses and stores the birth date and moves the record to `BirthDateKnown`.
    ///
    /// Fails with [`BotError::InvalidBirthDate`] when the text cannot be stored
    /// as a calendar date.
    async fn set_birth_date_and_upgrade_state(
        &self,
        user_id: &UserId,
        date_text: &str,
    ) -> Result<(), BotError>;

    /// Moves the record back to `Initial`, keeping name and birth date.
    async fn reset_user_state(&self, user_id: &UserId) -> Result<(), BotError>;

    /// Lists all stored users, most recently updated first.
    async fn list_users(&self) -> Result<Vec<User>, BotError>;
}
