// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bdaybot - a chat bot that counts the days until your next birthday.
//!
//! This is the binary entry point.

mod inspect;
mod serve;
mod shell;
mod stdio;

use std::path::PathBuf;

use bdaybot_config::BdaybotConfig;
use bdaybot_core::BotError;
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Bdaybot - a chat bot that counts the days until your next birthday.
#[derive(Parser, Debug)]
#[command(name = "bdaybot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the bot in an interactive REPL.
    Shell {
        /// User id the conversation is stored under.
        #[arg(long, default_value = "local")]
        user: String,
        /// Print replies as LINE message JSON.
        #[arg(long)]
        json: bool,
    },
    /// Serve JSON-lines conversations on stdin/stdout until input closes
    /// or a shutdown signal arrives.
    Serve,
    /// Print the effective configuration.
    Config,
    /// Show stored users.
    Inspect {
        /// Show only this user.
        user_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => bdaybot_config::load_and_validate_path(path),
        None => bdaybot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            bdaybot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.bot.log_level);

    let result = match cli.command {
        Some(Commands::Shell { user, json }) => shell::run_shell(config, &user, json).await,
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Inspect { user_id }) => {
            inspect::run_inspect(config, user_id.as_deref()).await
        }
        None => {
            println!("bdaybot: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bdaybot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_config(config: &BdaybotConfig) -> Result<(), BotError> {
    let rendered = toml::to_string_pretty(config).map_err(|e| BotError::Config(e.to_string()))?;
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_shell_flags() {
        let cli = Cli::parse_from(["bdaybot", "shell", "--user", "U42", "--json"]);
        match cli.command {
            Some(Commands::Shell { user, json }) => {
                assert_eq!(user, "U42");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_serve_with_config_override() {
        let cli = Cli::parse_from(["bdaybot", "serve", "--config", "/etc/bot.toml"]);
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/bot.toml")));
    }

    #[test]
    fn cli_parses_inspect_with_and_without_user() {
        let cli = Cli::parse_from(["bdaybot", "inspect"]);
        assert!(matches!(cli.command, Some(Commands::Inspect { user_id: None })));

        let cli = Cli::parse_from(["bdaybot", "--config", "bot.toml", "inspect", "U1"]);
        assert_eq!(cli.config, Some(PathBuf::from("bot.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Inspect { user_id: Some(ref id) }) if id == "U1"
        ));
    }

    #[test]
    fn default_config_renders_as_toml() {
        let rendered = toml::to_string_pretty(&BdaybotConfig::default()).unwrap();
        let parsed = bdaybot_config::load_and_validate_str(&rendered).unwrap();
        assert_eq!(parsed, BdaybotConfig::default());
    }
}
