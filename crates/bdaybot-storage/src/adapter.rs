// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the UserStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use bdaybot_config::model::StorageConfig;
use bdaybot_core::{
    AdapterType, BotError, HealthStatus, PluginAdapter, User, UserId, UserStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed user store.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query modules. The database is opened on the first call to
/// [`UserStore::initialize`].
pub struct SqliteUserStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteUserStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`UserStore::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, BotError> {
        self.db.get().ok_or_else(|| BotError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self) -> Result<(), BotError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteUserStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BotError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".into()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BotError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn initialize(&self) -> Result<(), BotError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| BotError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite user store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), BotError> {
        self.db()?;
        self.checkpoint().await
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, BotError> {
        queries::users::get_user(self.db()?, user_id).await
    }

    async fn set_greetings_received_state(&self, user_id: &UserId) -> Result<(), BotError> {
        queries::users::upsert_greeted(self.db()?, user_id).await?;
        debug!(user_id = %user_id, "greeting received");
        Ok(())
    }

    async fn set_user_name_and_upgrade_state(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<(), BotError> {
        queries::users::set_name(self.db()?, user_id, name).await?;
        debug!(user_id = %user_id, "name stored");
        Ok(())
    }

    async fn set_birth_date_and_upgrade_state(
        &self,
        user_id: &UserId,
        date_text: &str,
    ) -> Result<(), BotError> {
        let birth_date = bdaybot_dates::parse_birth_date(date_text).map_err(|e| {
            warn!(user_id = %user_id, error = %e, "rejected birth date");
            BotError::InvalidBirthDate {
                value: date_text.to_string(),
            }
        })?;
        queries::users::set_birth_date(self.db()?, user_id, birth_date).await?;
        debug!(user_id = %user_id, %birth_date, "birth date stored");
        Ok(())
    }

    async fn reset_user_state(&self, user_id: &UserId) -> Result<(), BotError> {
        queries::users::reset_state(self.db()?, user_id).await?;
        debug!(user_id = %user_id, "conversation reset");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, BotError> {
        queries::users::list_users(self.db()?).await
    }
}
