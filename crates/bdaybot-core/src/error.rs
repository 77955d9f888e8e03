// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the birthday bot.

use thiserror::Error;

/// The primary error type used across all adapter traits and the conversation engine.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The user store refused to persist a birth date.
    #[error("invalid birth date `{value}`")]
    InvalidBirthDate { value: String },

    /// An update targeted a user that has no stored record.
    #[error("user not found: {user_id}")]
    UserNotFound { user_id: String },

    /// Reply formatting errors (payload exceeds platform limits, bad labels).
    #[error("reply error: {message}")]
    Reply { message: String },

    /// Channel adapter errors (connection failure, closed inbound queue).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors, including broken record invariants.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        BotError::Storage {
            source: Box::new(err),
        }
    }
}
