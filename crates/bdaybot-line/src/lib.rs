// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE reply formatter for the birthday bot.
//!
//! [`LineFormatter`] builds [`ReplyPayload`]s that respect the LINE Messaging
//! API limits, and [`to_line_message`] renders them into the wire JSON.

pub mod message;

use async_trait::async_trait;
use tracing::debug;

use bdaybot_core::{AdapterType, BotError, HealthStatus, PluginAdapter, ReplyFormatter, ReplyPayload};

pub use message::{TextMessage, to_line_message};

/// Maximum characters in a LINE text message.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Maximum number of quick-reply buttons on one message.
pub const MAX_QUICK_REPLY_ITEMS: usize = 13;

/// Maximum characters in a quick-reply button label.
pub const MAX_LABEL_LENGTH: usize = 20;

/// Formatter producing LINE-compatible reply payloads.
#[derive(Debug, Default, Clone)]
pub struct LineFormatter;

impl LineFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// Cut `text` to at most [`MAX_TEXT_LENGTH`] characters.
fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_LENGTH) {
        Some((idx, _)) => {
            debug!(
                original = text.chars().count(),
                max = MAX_TEXT_LENGTH,
                "truncating reply text"
            );
            text[..idx].to_string()
        }
        None => text.to_string(),
    }
}

fn check_labels(labels: &[String]) -> Result<(), BotError> {
    if labels.is_empty() || labels.len() > MAX_QUICK_REPLY_ITEMS {
        return Err(BotError::Reply {
            message: format!(
                "quick reply needs 1 to {MAX_QUICK_REPLY_ITEMS} labels, got {}",
                labels.len()
            ),
        });
    }
    for label in labels {
        let len = label.chars().count();
        if label.trim().is_empty() || len > MAX_LABEL_LENGTH {
            return Err(BotError::Reply {
                message: format!(
                    "quick reply label `{label}` must be 1 to {MAX_LABEL_LENGTH} characters"
                ),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl PluginAdapter for LineFormatter {
    fn name(&self) -> &str {
        "line"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Formatter
    }

    async fn health_check(&self) -> Result<HealthStatus, BotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BotError> {
        Ok(())
    }
}

#[async_trait]
impl ReplyFormatter for LineFormatter {
    async fn get_reply_text_object(&self, text: &str) -> Result<ReplyPayload, BotError> {
        Ok(ReplyPayload::Text {
            text: truncate_text(text),
        })
    }

    async fn get_quick_reply_object(
        &self,
        prompt: &str,
        labels: &[String],
    ) -> Result<ReplyPayload, BotError> {
        check_labels(labels)?;
        Ok(ReplyPayload::QuickReply {
            text: truncate_text(prompt),
            labels: labels.to_vec(),
        })
    }
}
