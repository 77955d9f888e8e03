// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the conversation engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Opaque, stable user identifier assigned by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Persisted stage of a user's conversation.
///
/// The progression is linear: `Initial -> Greeted -> NameKnown -> BirthDateKnown`,
/// after which the conversation resets to `Initial`. A user without a stored
/// record is treated as `Initial`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// New contact, or a conversation that finished and was reset.
    #[default]
    Initial,
    /// Greeting received, waiting for the user's name.
    Greeted,
    /// Name stored, waiting for the birth date.
    NameKnown,
    /// Birth date stored, waiting for the yes/no answer.
    BirthDateKnown,
}

impl ConversationState {
    /// The state a successful turn advances to.
    pub fn next(self) -> Self {
        match self {
            ConversationState::Initial => ConversationState::Greeted,
            ConversationState::Greeted => ConversationState::NameKnown,
            ConversationState::NameKnown => ConversationState::BirthDateKnown,
            ConversationState::BirthDateKnown => ConversationState::Initial,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    ///
    /// States only advance one step or reset to `Initial`.
    pub fn can_transition_to(self, to: ConversationState) -> bool {
        to == self.next() || to == ConversationState::Initial
    }
}

/// The sole persisted entity: one chat contact and their conversation progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub state: ConversationState,
    /// Set once the user answered the name prompt.
    pub name: Option<String>,
    /// Set once the user answered the birth date prompt.
    pub birth_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// A fresh record in the `Initial` state.
    pub fn new(id: UserId) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            state: ConversationState::Initial,
            name: None,
            birth_date: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Platform-neutral reply produced by a reply formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyPayload {
    /// Plain text message.
    Text { text: String },
    /// Prompt offering a fixed, ordered set of selectable options.
    QuickReply { text: String, labels: Vec<String> },
}

impl ReplyPayload {
    /// The message text, regardless of payload kind.
    pub fn text(&self) -> &str {
        match self {
            ReplyPayload::Text { text } | ReplyPayload::QuickReply { text, .. } => text,
        }
    }

    /// Quick-reply labels, empty for plain text.
    pub fn labels(&self) -> &[String] {
        match self {
            ReplyPayload::Text { .. } => &[],
            ReplyPayload::QuickReply { labels, .. } => labels,
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Formatter,
}

/// An inbound text message received from a channel adapter.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    pub channel: String,
    pub sender_id: UserId,
    pub text: String,
    /// RFC 3339 receipt time.
    pub timestamp: String,
}

/// A reply to be delivered via a channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub channel: String,
    pub recipient_id: UserId,
    /// Id of the inbound message this answers.
    pub reply_to: Option<String>,
    pub payload: ReplyPayload,
}
