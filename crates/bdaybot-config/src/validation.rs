// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes:
//! non-empty paths and texts, exactly two quick-reply labels, and answer
//! phrase lists that agree with those labels.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::BdaybotConfig;

/// Accepted values for `bot.log_level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BdaybotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` must be one of: {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    validate_conversation(config, &mut errors);
    validate_replies(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_conversation(config: &BdaybotConfig, errors: &mut Vec<ConfigError>) {
    let conversation = &config.conversation;

    for (key, phrases) in [
        ("conversation.yes_responses", &conversation.yes_responses),
        ("conversation.no_responses", &conversation.no_responses),
    ] {
        if phrases.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must contain at least one phrase"),
            });
        }
        for phrase in phrases {
            if phrase.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!("{key} must not contain empty phrases"),
                });
            } else if phrase.to_lowercase() != *phrase {
                // Incoming text is lower-cased before lookup, so upper case never matches.
                errors.push(ConfigError::Validation {
                    message: format!("{key} phrase `{phrase}` must be lower case"),
                });
            }
        }
    }

    let yes: HashSet<&str> = conversation.yes_responses.iter().map(String::as_str).collect();
    for phrase in &conversation.no_responses {
        if yes.contains(phrase.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "phrase `{phrase}` appears in both conversation.yes_responses and conversation.no_responses"
                ),
            });
        }
    }

    match conversation.quick_reply_labels.as_slice() {
        [yes_label, no_label] => {
            if !conversation
                .yes_responses
                .contains(&yes_label.trim().to_lowercase())
            {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "quick reply label `{yes_label}` is not recognized by conversation.yes_responses"
                    ),
                });
            }
            if !conversation
                .no_responses
                .contains(&no_label.trim().to_lowercase())
            {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "quick reply label `{no_label}` is not recognized by conversation.no_responses"
                    ),
                });
            }
        }
        labels => errors.push(ConfigError::Validation {
            message: format!(
                "conversation.quick_reply_labels must contain exactly 2 labels, got {}",
                labels.len()
            ),
        }),
    }
}

fn validate_replies(config: &BdaybotConfig, errors: &mut Vec<ConfigError>) {
    let replies = &config.replies;
    let templates = [
        ("replies.ask_name", &replies.ask_name),
        ("replies.ask_birth_date", &replies.ask_birth_date),
        ("replies.ask_remaining_days", &replies.ask_remaining_days),
        ("replies.say_remaining_days", &replies.say_remaining_days),
        ("replies.say_goodbye", &replies.say_goodbye),
        (
            "replies.say_unrecognized_date_format",
            &replies.say_unrecognized_date_format,
        ),
        ("replies.say_dont_understand", &replies.say_dont_understand),
    ];

    for (key, text) in templates {
        if text.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = BdaybotConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = BdaybotConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = BdaybotConfig::default();
        config.bot.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "bot.log_level"));
    }

    #[test]
    fn three_labels_fail_validation() {
        let mut config = BdaybotConfig::default();
        config.conversation.quick_reply_labels =
            vec!["Yes".into(), "No".into(), "Maybe".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "exactly 2 labels, got 3"));
    }

    #[test]
    fn label_must_be_a_recognized_answer() {
        let mut config = BdaybotConfig::default();
        config.conversation.quick_reply_labels = vec!["Absolutely".into(), "No".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "`Absolutely` is not recognized"));
    }

    #[test]
    fn overlapping_phrases_fail_validation() {
        let mut config = BdaybotConfig::default();
        config.conversation.no_responses.push("ok".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "phrase `ok` appears in both"));
    }

    #[test]
    fn upper_case_phrase_fails_validation() {
        let mut config = BdaybotConfig::default();
        config.conversation.yes_responses.push("Sure thing".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "`Sure thing` must be lower case"));
    }

    #[test]
    fn empty_phrase_list_fails_validation() {
        let mut config = BdaybotConfig::default();
        config.conversation.no_responses.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "conversation.no_responses must contain at least one"));
    }

    #[test]
    fn empty_template_fails_validation() {
        let mut config = BdaybotConfig::default();
        config.replies.say_goodbye = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "replies.say_goodbye must not be empty"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = BdaybotConfig::default();
        config.storage.database_path = String::new();
        config.replies.ask_name = String::new();
        config.conversation.quick_reply_labels.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
