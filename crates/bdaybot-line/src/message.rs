// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LINE Messaging API message objects.
//!
//! Only the subset the bot sends is modeled: a text message, optionally
//! carrying quick-reply buttons whose action posts the label back as text.

use bdaybot_core::ReplyPayload;
use serde::{Deserialize, Serialize};

/// A LINE text message object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_reply: Option<QuickReply>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: MessageAction,
}

/// Action that sends `text` as a message from the user when tapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub text: String,
}

impl QuickReplyItem {
    fn message(label: &str) -> Self {
        Self {
            kind: "action".into(),
            action: MessageAction {
                kind: "message".into(),
                label: label.to_string(),
                text: label.to_string(),
            },
        }
    }
}

impl From<&ReplyPayload> for TextMessage {
    fn from(payload: &ReplyPayload) -> Self {
        let quick_reply = match payload {
            ReplyPayload::Text { .. } => None,
            ReplyPayload::QuickReply { labels, .. } => Some(QuickReply {
                items: labels.iter().map(|l| QuickReplyItem::message(l)).collect(),
            }),
        };
        Self {
            kind: "text".into(),
            text: payload.text().to_string(),
            quick_reply,
        }
    }
}

/// Render a payload as the JSON message object the LINE reply endpoint accepts.
pub fn to_line_message(payload: &ReplyPayload) -> serde_json::Value {
    // Serializing plain structs of strings cannot fail.
    serde_json::to_value(TextMessage::from(payload)).unwrap_or(serde_json::Value::Null)
}
