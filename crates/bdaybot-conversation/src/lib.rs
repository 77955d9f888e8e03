// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine and message loop for the birthday bot.
//!
//! The [`BotLoop`] is the host that:
//! - Receives messages from a channel adapter
//! - Queues each user's messages to that user's worker, in arrival order
//! - Runs each turn through the [`ConversationEngine`]
//! - Sends the reply back through the channel
//! - Drains queued turns on shutdown

pub mod engine;
pub mod locks;
pub mod shutdown;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bdaybot_core::{BotError, ChannelAdapter, InboundMessage, OutboundMessage, UserId};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub use engine::{Answer, AnswerMatcher, ConversationEngine};
pub use locks::UserLocks;

/// Default time given to queued turns on shutdown.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Couples a channel adapter to the conversation engine.
pub struct BotLoop {
    channel: Arc<dyn ChannelAdapter>,
    engine: Arc<ConversationEngine>,
    drain_timeout: Duration,
}

/// Per-user queues owned by a running loop.
struct Workers {
    queues: HashMap<UserId, mpsc::UnboundedSender<InboundMessage>>,
    tasks: JoinSet<()>,
}

impl BotLoop {
    pub fn new(channel: Arc<dyn ChannelAdapter>, engine: Arc<ConversationEngine>) -> Self {
        Self {
            channel,
            engine,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    /// Runs until the token is cancelled or the channel closes.
    ///
    /// Every user gets one worker task fed by an unbounded FIFO queue, so a
    /// user's turns run strictly in arrival order while different users
    /// proceed concurrently. On stop the queues are closed and the workers
    /// finish what they already received, bounded by the drain timeout.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), BotError> {
        info!(channel = self.channel.name(), "bot loop running");
        let mut workers = Workers {
            queues: HashMap::new(),
            tasks: JoinSet::new(),
        };

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => self.dispatch(&mut workers, inbound),
                        Err(BotError::Channel { message, .. }) => {
                            info!(reason = message.as_str(), "channel closed, stopping bot loop");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                        }
                    }
                }
                Some(joined) = workers.tasks.join_next(), if !workers.tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "user worker failed");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping bot loop");
                    break;
                }
            }
        }

        workers.queues.clear();
        shutdown::drain_turns(&mut workers.tasks, self.drain_timeout).await;
        self.engine.store().close().await?;

        info!("bot loop stopped");
        Ok(())
    }

    /// Queues `inbound` on its sender's worker, starting one if needed.
    fn dispatch(&self, workers: &mut Workers, inbound: InboundMessage) {
        let inbound = match workers.queues.get(&inbound.sender_id) {
            Some(queue) => match queue.send(inbound) {
                Ok(()) => return,
                // The worker is gone (it panicked); start a fresh one.
                Err(mpsc::error::SendError(inbound)) => {
                    warn!(user_id = %inbound.sender_id, "user worker stopped, restarting");
                    inbound
                }
            },
            None => inbound,
        };

        let user_id = inbound.sender_id.clone();
        let (queue, rx) = mpsc::unbounded_channel();
        if queue.send(inbound).is_err() {
            return;
        }
        debug!(user_id = %user_id, "starting user worker");
        workers.tasks.spawn(user_worker(
            self.channel.clone(),
            self.engine.clone(),
            rx,
        ));
        workers.queues.insert(user_id, queue);
    }
}

/// Runs one user's turns in queue order until the queue is closed.
async fn user_worker(
    channel: Arc<dyn ChannelAdapter>,
    engine: Arc<ConversationEngine>,
    mut rx: mpsc::UnboundedReceiver<InboundMessage>,
) {
    while let Some(inbound) = rx.recv().await {
        handle_turn(channel.as_ref(), &engine, inbound).await;
    }
}

/// Runs one turn and sends the reply.
async fn handle_turn(
    channel: &dyn ChannelAdapter,
    engine: &ConversationEngine,
    inbound: InboundMessage,
) {
    debug!(
        user_id = %inbound.sender_id,
        channel = inbound.channel.as_str(),
        "handling inbound message"
    );

    let payload = match engine
        .receive_message_and_reply(&inbound.sender_id, &inbound.text)
        .await
    {
        Ok(payload) => payload,
        Err(e) => {
            error!(user_id = %inbound.sender_id, error = %e, "turn failed");
            return;
        }
    };

    let out = OutboundMessage {
        channel: inbound.channel,
        recipient_id: inbound.sender_id,
        reply_to: Some(inbound.id),
        payload,
    };
    if let Err(e) = channel.send(out).await {
        error!(error = %e, "failed to send reply");
    }
}
