// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bdaybot inspect` command implementation.

use bdaybot_config::BdaybotConfig;
use bdaybot_core::{BotError, User, UserId, UserStore};
use bdaybot_storage::SqliteUserStore;
use colored::Colorize;

/// Prints one stored user, or every stored user when `user_id` is `None`.
pub async fn run_inspect(config: BdaybotConfig, user_id: Option<&str>) -> Result<(), BotError> {
    let store = SqliteUserStore::new(config.storage.clone());
    store.initialize().await?;

    let result = print_users(&store, user_id).await;
    store.close().await?;
    result
}

async fn print_users(store: &dyn UserStore, user_id: Option<&str>) -> Result<(), BotError> {
    match user_id {
        Some(id) => match store.get_user_by_id(&UserId::from(id)).await? {
            Some(user) => println!("{}", format_user(&user)),
            None => {
                return Err(BotError::UserNotFound {
                    user_id: id.to_string(),
                });
            }
        },
        None => {
            let users = store.list_users().await?;
            if users.is_empty() {
                println!("{}", "no users stored".dimmed());
            }
            for user in &users {
                println!("{}", format_user(user));
            }
        }
    }
    Ok(())
}

/// One-line summary of a user record.
pub fn format_user(user: &User) -> String {
    let name = user.name.as_deref().unwrap_or("-");
    let birth_date = user
        .birth_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<24} {:<18} name={:<16} birth_date={:<10} updated={}",
        user.id.as_str().bold(),
        user.state.to_string(),
        name,
        birth_date,
        user.updated_at
    )
}
