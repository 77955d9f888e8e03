// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bdaybot.toml` > `~/.config/bdaybot/bdaybot.toml` > `/etc/bdaybot/bdaybot.toml`
//! with environment variable overrides via `BDAYBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BdaybotConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/bdaybot/bdaybot.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "bdaybot.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bdaybot/bdaybot.toml` (system-wide)
/// 3. `~/.config/bdaybot/bdaybot.toml` (user XDG config)
/// 4. `./bdaybot.toml` (local directory)
/// 5. `BDAYBOT_*` environment variables
pub fn load_config() -> Result<BdaybotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BdaybotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BdaybotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BdaybotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BdaybotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BdaybotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Location of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("bdaybot/bdaybot.toml"))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `BDAYBOT_STORAGE_DATABASE_PATH`
/// must map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("BDAYBOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: BDAYBOT_BOT_LOG_LEVEL -> "bot_log_level"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("conversation_", "conversation.", 1)
            .replacen("replies_", "replies.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_map_sections_to_dots() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BDAYBOT_BOT_LOG_LEVEL", "debug");
            jail.set_env("BDAYBOT_STORAGE_DATABASE_PATH", "/tmp/env.db");
            jail.set_env("BDAYBOT_REPLIES_SAY_GOODBYE", "bye from env");

            let config: BdaybotConfig = Figment::new()
                .merge(Serialized::defaults(BdaybotConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.bot.log_level, "debug");
            assert_eq!(config.storage.database_path, "/tmp/env.db");
            assert_eq!(config.replies.say_goodbye, "bye from env");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_PATH,
                r#"
[bot]
name = "from-file"
"#,
            )?;

            let config = load_config()?;
            assert_eq!(config.bot.name, "from-file");
            Ok(())
        });
    }

    #[test]
    fn env_beats_local_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(LOCAL_CONFIG_PATH, "[bot]\nname = \"from-file\"\n")?;
            jail.set_env("BDAYBOT_BOT_NAME", "from-env");

            let config = load_config()?;
            assert_eq!(config.bot.name, "from-env");
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[storage]\nwal_mode = false\n")?;

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert!(!config.storage.wal_mode);
            Ok(())
        });
    }
}
