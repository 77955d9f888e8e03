// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the birthday bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BdaybotConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Recognized answers and quick-reply labels.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Prompt and response texts.
    #[serde(default)]
    pub replies: ReplyTemplates,
}

/// Bot identity configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "bdaybot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("bdaybot").join("bdaybot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("bdaybot.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Phrases accepted as answers to the yes/no question.
///
/// Matching is a case-insensitive membership test: the user's text is
/// trimmed, lower-cased and looked up in these lists verbatim.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationConfig {
    /// Affirmative answers (lower case).
    #[serde(default = "default_yes_responses")]
    pub yes_responses: Vec<String>,

    /// Negative answers (lower case).
    #[serde(default = "default_no_responses")]
    pub no_responses: Vec<String>,

    /// The two quick-reply option labels, affirmative first.
    #[serde(default = "default_quick_reply_labels")]
    pub quick_reply_labels: Vec<String>,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            yes_responses: default_yes_responses(),
            no_responses: default_no_responses(),
            quick_reply_labels: default_quick_reply_labels(),
        }
    }
}

fn default_yes_responses() -> Vec<String> {
    ["yes", "y", "yeah", "yep", "sure", "ok", "okay"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_no_responses() -> Vec<String> {
    ["no", "n", "nope", "nah", "no thanks"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_quick_reply_labels() -> Vec<String> {
    vec!["Yes".to_string(), "No".to_string()]
}

/// Prompt and response texts sent by the bot.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyTemplates {
    /// Sent to a new contact.
    #[serde(default = "default_ask_name")]
    pub ask_name: String,

    /// Sent after the name, prefixed with `"{name}, "`.
    #[serde(default = "default_ask_birth_date")]
    pub ask_birth_date: String,

    /// Quick-reply prompt offered once the birth date is known.
    #[serde(default = "default_ask_remaining_days")]
    pub ask_remaining_days: String,

    /// Follows the day count in `"There are {N} ..."`.
    #[serde(default = "default_say_remaining_days")]
    pub say_remaining_days: String,

    #[serde(default = "default_say_goodbye")]
    pub say_goodbye: String,

    #[serde(default = "default_say_unrecognized_date_format")]
    pub say_unrecognized_date_format: String,

    #[serde(default = "default_say_dont_understand")]
    pub say_dont_understand: String,
}

impl Default for ReplyTemplates {
    fn default() -> Self {
        Self {
            ask_name: default_ask_name(),
            ask_birth_date: default_ask_birth_date(),
            ask_remaining_days: default_ask_remaining_days(),
            say_remaining_days: default_say_remaining_days(),
            say_goodbye: default_say_goodbye(),
            say_unrecognized_date_format: default_say_unrecognized_date_format(),
            say_dont_understand: default_say_dont_understand(),
        }
    }
}

fn default_ask_name() -> String {
    "Hi there! What's your name?".to_string()
}

fn default_ask_birth_date() -> String {
    "when is your birthday? Please send it as YYYY-MM-DD.".to_string()
}

fn default_ask_remaining_days() -> String {
    "Would you like to know how many days are left until your next birthday?".to_string()
}

fn default_say_remaining_days() -> String {
    "days left until your next birthday!".to_string()
}

fn default_say_goodbye() -> String {
    "Alright, goodbye! Send me a message any time.".to_string()
}

fn default_say_unrecognized_date_format() -> String {
    "Sorry, I couldn't read that date. Please use the YYYY-MM-DD format, e.g. 1990-05-20."
        .to_string()
}

fn default_say_dont_understand() -> String {
    "Sorry, I didn't understand. Please answer yes or no.".to_string()
}
