// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply formatter trait for platform-specific message envelopes.

use async_trait::async_trait;

use crate::error::BotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ReplyPayload;

/// Wraps reply text into payloads a chat platform accepts.
#[async_trait]
pub trait ReplyFormatter: PluginAdapter {
    /// Wraps plain text into a text reply.
    async fn get_reply_text_object(&self, text: &str) -> Result<ReplyPayload, BotError>;

    /// Wraps a prompt plus an ordered set of selectable option labels.
    async fn get_quick_reply_object(
        &self,
        prompt: &str,
        labels: &[String],
    ) -> Result<ReplyPayload, BotError>;
}
