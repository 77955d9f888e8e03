// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound messages
//! and captured outbound messages for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use bdaybot_core::{
    AdapterType, BotError, ChannelAdapter, HealthStatus, InboundMessage, MessageId,
    OutboundMessage, PluginAdapter, UserId,
};

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Messages injected via `inject_message()` are returned by `receive()`
/// - **sent**: Messages passed to `send()` are captured and retrievable via `sent_messages()`
///
/// After [`MockChannel::close`], `receive()` drains the remaining inbound
/// messages and then fails with [`BotError::Channel`].
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    notify: Arc<Notify>,
    sent_notify: Arc<Notify>,
    closed: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            sent_notify: Arc::new(Notify::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Inject an inbound message into the receive queue.
    pub async fn inject_message(&self, msg: InboundMessage) {
        self.inbound.lock().await.push_back(msg);
        self.notify.notify_one();
    }

    /// Inject a text message from `sender`.
    pub async fn inject_text(&self, sender: &str, text: &str) {
        self.inject_message(make_inbound(sender, text)).await;
    }

    /// Mark the channel closed once the queued messages are consumed.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Wait until at least `count` messages were sent, or `timeout` elapses.
    ///
    /// Returns whether the count was reached.
    pub async fn wait_for_sent(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.sent_notify.notified();
                if self.sent_count().await >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an inbound text message on the `mock` channel.
pub fn make_inbound(sender: &str, text: &str) -> InboundMessage {
    InboundMessage {
        id: format!("mock-in-{}", uuid::Uuid::new_v4()),
        channel: "mock".to_string(),
        sender_id: UserId::from(sender),
        text: text.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, BotError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BotError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, BotError> {
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        self.sent_notify.notify_waiters();
        Ok(MessageId(id))
    }

    async fn receive(&self) -> Result<InboundMessage, BotError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(msg) = queue.pop_front() {
                    return Ok(msg);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(BotError::Channel {
                    message: "mock channel closed".to_string(),
                    source: None,
                });
            }
            // Wait for notification that a new message was injected.
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdaybot_core::ReplyPayload;

    #[tokio::test]
    async fn receive_returns_injected_messages() {
        let channel = MockChannel::new();
        channel.inject_text("test-user", "hello").await;

        let received = channel.receive().await.unwrap();
        assert_eq!(received.sender_id, UserId::from("test-user"));
        assert_eq!(received.text, "hello");
    }

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let channel = MockChannel::new();
        let msg = OutboundMessage {
            channel: "mock".to_string(),
            recipient_id: UserId::from("test-user"),
            reply_to: None,
            payload: ReplyPayload::Text {
                text: "response text".to_string(),
            },
        };

        let msg_id = channel.send(msg).await.unwrap();
        assert!(msg_id.0.starts_with("mock-msg-"));

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload.text(), "response text");
        assert!(channel.wait_for_sent(1, Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn closed_channel_drains_then_errors() {
        let channel = MockChannel::new();
        channel.inject_text("u", "last").await;
        channel.close();

        assert_eq!(channel.receive().await.unwrap().text, "last");
        assert!(matches!(
            channel.receive().await,
            Err(BotError::Channel { .. })
        ));
    }
}
