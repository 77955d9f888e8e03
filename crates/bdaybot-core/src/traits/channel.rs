// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the host that feeds messages to the bot.

use async_trait::async_trait;

use crate::error::BotError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage};

/// Source of inbound text messages and sink for replies.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Sends a reply through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, BotError>;

    /// Receives the next inbound message from the channel.
    ///
    /// Returns [`BotError::Channel`] once the channel is closed.
    async fn receive(&self) -> Result<InboundMessage, BotError>;
}
