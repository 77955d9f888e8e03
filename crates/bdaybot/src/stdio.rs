// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-lines channel adapter over stdin and stdout.
//!
//! Each input line is `{"user": "<id>", "text": "<message>"}`. Each reply is
//! written as one line `{"to": "<id>", "reply_to": "<id>", "message": {...}}`
//! where `message` is the LINE message object for the reply.

use std::io::BufRead;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bdaybot_core::{
    AdapterType, BotError, ChannelAdapter, HealthStatus, InboundMessage, MessageId,
    OutboundMessage, PluginAdapter, UserId,
};
use bdaybot_line::to_line_message;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

/// Lines buffered between the reader thread and the bot loop.
const LINE_BUFFER: usize = 64;

/// One input line.
#[derive(Debug, Deserialize)]
struct StdioInbound {
    user: String,
    text: String,
}

/// One output line.
#[derive(Debug, Serialize)]
struct StdioOutbound<'a> {
    to: &'a str,
    reply_to: Option<&'a str>,
    message: serde_json::Value,
}

/// Channel adapter reading JSON lines from a line source and writing replies
/// to `W`.
pub struct StdioChannel<W> {
    lines: Mutex<mpsc::Receiver<std::io::Result<String>>>,
    writer: Mutex<W>,
    received: AtomicU64,
    sent: AtomicU64,
}

impl StdioChannel<tokio::io::Stdout> {
    /// Reads the process stdin and writes replies to stdout.
    ///
    /// Stdin is read on a detached thread since a blocking read cannot be
    /// cancelled; the thread ends with the process.
    pub fn stdio() -> Self {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self::new(rx, tokio::io::stdout())
    }
}

impl<W> StdioChannel<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Builds a channel from a line receiver and a reply writer.
    ///
    /// The channel closes once every sender of `lines` is dropped.
    pub fn new(lines: mpsc::Receiver<std::io::Result<String>>, writer: W) -> Self {
        Self {
            lines: Mutex::new(lines),
            writer: Mutex::new(writer),
            received: AtomicU64::new(0),
            sent: AtomicU64::new(0),
        }
    }

    fn to_inbound(&self, msg: StdioInbound) -> InboundMessage {
        let n = self.received.fetch_add(1, Ordering::Relaxed) + 1;
        InboundMessage {
            id: format!("stdio-in-{n}"),
            channel: "stdio".to_string(),
            sender_id: UserId::new(msg.user.trim()),
            text: msg.text,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Parses one input line; `None` for blank lines.
fn parse_line(line: &str) -> Option<Result<StdioInbound, String>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let parsed = serde_json::from_str::<StdioInbound>(line)
        .map_err(|e| e.to_string())
        .and_then(|msg| {
            if msg.user.trim().is_empty() {
                Err("`user` must not be empty".to_string())
            } else {
                Ok(msg)
            }
        });
    Some(parsed)
}

fn write_error(e: std::io::Error) -> BotError {
    BotError::Channel {
        message: "failed to write reply".to_string(),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl<W> PluginAdapter for StdioChannel<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        "stdio"
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
        self.lines.lock().await.close();
        self.writer.lock().await.flush().await.map_err(write_error)
    }
}

#[async_trait]
impl<W> ChannelAdapter for StdioChannel<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, BotError> {
        let out = StdioOutbound {
            to: msg.recipient_id.as_str(),
            reply_to: msg.reply_to.as_deref(),
            message: to_line_message(&msg.payload),
        };
        let mut line = serde_json::to_string(&out).map_err(|e| BotError::Channel {
            message: "failed to encode reply".to_string(),
            source: Some(Box::new(e)),
        })?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await.map_err(write_error)?;
        writer.flush().await.map_err(write_error)?;

        let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(MessageId(format!("stdio-out-{n}")))
    }

    async fn receive(&self) -> Result<InboundMessage, BotError> {
        let mut lines = self.lines.lock().await;
        loop {
            let line = match lines.recv().await {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    return Err(BotError::Channel {
                        message: "failed to read input".to_string(),
                        source: Some(Box::new(e)),
                    });
                }
                None => {
                    return Err(BotError::Channel {
                        message: "input closed".to_string(),
                        source: None,
                    });
                }
            };

            match parse_line(&line) {
                Some(Ok(msg)) => {
                    debug!(user_id = msg.user.as_str(), "stdio message received");
                    return Ok(self.to_inbound(msg));
                }
                Some(Err(reason)) => warn!(reason = reason.as_str(), "skipping malformed input line"),
                None => {}
            }
        }
    }
}
