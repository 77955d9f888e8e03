// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bdaybot serve` command implementation.
//!
//! Hosts the bot loop over the JSON-lines stdio channel until input closes
//! or SIGINT/SIGTERM arrives, then drains queued turns and closes the store.

use std::sync::Arc;

use bdaybot_config::BdaybotConfig;
use bdaybot_conversation::{BotLoop, ConversationEngine, shutdown};
use bdaybot_core::{BotError, UserStore};
use bdaybot_dates::SystemClock;
use bdaybot_line::LineFormatter;
use bdaybot_storage::SqliteUserStore;
use tracing::info;

use crate::stdio::StdioChannel;

/// Runs the `bdaybot serve` command.
pub async fn run_serve(config: BdaybotConfig) -> Result<(), BotError> {
    let store = SqliteUserStore::new(config.storage.clone());
    store.initialize().await?;

    let engine = Arc::new(ConversationEngine::new(
        Arc::new(store),
        Arc::new(LineFormatter::new()),
        Arc::new(SystemClock),
        &config,
    ));
    let channel = Arc::new(StdioChannel::stdio());

    let cancel = shutdown::install_signal_handler();
    info!(bot = config.bot.name.as_str(), "serving JSON lines on stdin/stdout");

    BotLoop::new(channel, engine).run(cancel).await?;

    info!("bdaybot serve shutdown complete");
    Ok(())
}
