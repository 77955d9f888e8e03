// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bdaybot shell` command implementation.
//!
//! Launches an interactive REPL with colored prompt and readline history.
//! Every line is one turn for the chosen user against the configured
//! SQLite store, so a conversation can be resumed across invocations.

use std::sync::Arc;

use bdaybot_config::BdaybotConfig;
use bdaybot_conversation::ConversationEngine;
use bdaybot_core::{BotError, ReplyPayload, UserId, UserStore};
use bdaybot_dates::SystemClock;
use bdaybot_line::{LineFormatter, to_line_message};
use bdaybot_storage::SqliteUserStore;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

/// Runs the `bdaybot shell` interactive REPL.
pub async fn run_shell(config: BdaybotConfig, user: &str, json: bool) -> Result<(), BotError> {
    let store = SqliteUserStore::new(config.storage.clone());
    store.initialize().await?;
    let store: Arc<dyn UserStore> = Arc::new(store);

    let engine = ConversationEngine::new(
        store.clone(),
        Arc::new(LineFormatter::new()),
        Arc::new(SystemClock),
        &config,
    );
    let user_id = UserId::from(user);
    info!(user_id = %user_id, "shell session started");

    let mut rl = DefaultEditor::new()
        .map_err(|e| BotError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.bot.name).bold().green());
    println!("Chatting as {}. Type {} to exit.\n", user.cyan(), "/quit".yellow());

    let prompt = format!("{}> ", user.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match engine.receive_message_and_reply(&user_id, trimmed).await {
                    Ok(reply) => println!("{}", render_reply(&reply, json)),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    store.close().await
}

/// Formats a reply for the terminal.
///
/// Quick-reply labels are shown as bracketed buttons under the text; with
/// `json` the LINE message object is printed instead.
pub fn render_reply(reply: &ReplyPayload, json: bool) -> String {
    if json {
        let value = to_line_message(reply);
        return serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    }
    let mut out = format!("{} {}", "bot:".blue().bold(), reply.text());
    if !reply.labels().is_empty() {
        let buttons: Vec<String> = reply
            .labels()
            .iter()
            .map(|l| format!("[{l}]"))
            .collect();
        out.push('\n');
        out.push_str(&format!("     {}", buttons.join(" ").yellow()));
    }
    out
}
