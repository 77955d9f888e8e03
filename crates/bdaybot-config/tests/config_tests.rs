// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the configuration system.

use bdaybot_config::diagnostic::ConfigError;
use bdaybot_config::model::BdaybotConfig;
use bdaybot_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[bot]
name = "birthday-buddy"
log_level = "debug"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[conversation]
yes_responses = ["yes", "oui"]
no_responses = ["no", "non"]
quick_reply_labels = ["Oui", "Non"]

[replies]
ask_name = "Bonjour ! Comment tu t'appelles ?"
say_goodbye = "Au revoir"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "birthday-buddy");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.conversation.yes_responses, vec!["yes", "oui"]);
    assert_eq!(config.conversation.quick_reply_labels, vec!["Oui", "Non"]);
    assert_eq!(config.replies.ask_name, "Bonjour ! Comment tu t'appelles ?");
    assert_eq!(config.replies.say_goodbye, "Au revoir");
    // Unset templates keep their defaults.
    assert_eq!(
        config.replies.say_remaining_days,
        BdaybotConfig::default().replies.say_remaining_days
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("empty TOML should use defaults");
    assert_eq!(config, BdaybotConfig::default());
    assert_eq!(config.bot.name, "bdaybot");
    assert_eq!(config.bot.log_level, "info");
    assert!(config.storage.wal_mode);
    assert!(config.storage.database_path.ends_with("bdaybot.db"));
    assert_eq!(config.conversation.quick_reply_labels, vec!["Yes", "No"]);
    assert!(config.conversation.yes_responses.contains(&"yes".to_string()));
    assert!(config.conversation.no_responses.contains(&"no".to_string()));
}

/// Unknown field in a section is rejected.
#[test]
fn unknown_field_in_replies_produces_error() {
    let toml = r#"
[replies]
say_goodbey = "bye"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("say_goodbey"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[telegram]
bot_token = "abc"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// The diagnostic for a misspelled key suggests a fix and lists known keys.
#[test]
fn diagnostic_error_includes_suggestion() {
    let toml = r#"
[replies]
say_goodbey = "bye"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let unknown = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::UnknownKey {
                key,
                suggestion,
                known_keys,
                ..
            } => Some((key, suggestion, known_keys)),
            _ => None,
        })
        .expect("should contain an unknown key error");

    assert_eq!(unknown.0, "say_goodbey");
    assert_eq!(unknown.1.as_deref(), Some("say_goodbye"));
    assert!(unknown.2.contains(&"ask_name"));
}

/// Wrong value type is reported as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[storage]
wal_mode = "sometimes"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("wal_mode")))
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_from_load() {
    let toml = r#"
[conversation]
quick_reply_labels = ["Yes"]
"#;

    let errors = load_and_validate_str(toml).expect_err("one label should be rejected");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("exactly 2 labels"))
    ));
}

/// A config file given by path is loaded and validated.
#[test]
fn load_from_explicit_path() {
    let dir = std::env::temp_dir().join(format!("bdaybot-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bdaybot.toml");
    std::fs::write(&path, "[bot]\nname = \"from-path\"\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config should load");
    assert_eq!(config.bot.name, "from-path");

    std::fs::remove_dir_all(&dir).unwrap();
}
