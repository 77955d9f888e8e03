// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation testing.
//!
//! `TestHarness` assembles an engine with a LINE formatter, a fixed clock and
//! either an in-memory store or a temp SQLite database. `send()` drives one
//! turn for a user under a `UserLocks` guard, so concurrent sends for one
//! user never interleave.

use std::sync::Arc;

use bdaybot_config::model::{BdaybotConfig, StorageConfig};
use bdaybot_conversation::{ConversationEngine, UserLocks};
use bdaybot_core::{BotError, ConversationState, ReplyPayload, User, UserId, UserStore};
use bdaybot_dates::FixedClock;
use bdaybot_line::LineFormatter;
use bdaybot_storage::SqliteUserStore;
use chrono::NaiveDate;

use crate::memory_store::InMemoryUserStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    today: NaiveDate,
    sqlite: bool,
    config: BdaybotConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            today: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or(NaiveDate::MIN),
            sqlite: false,
            config: BdaybotConfig::default(),
        }
    }

    /// Pin "today" for remaining-day calculations.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Back the engine with a temp SQLite database instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Use a custom configuration (phrases, labels, templates).
    pub fn with_config(mut self, config: BdaybotConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, BotError> {
        let mut temp_dir = None;
        let mut memory = None;

        let store: Arc<dyn UserStore> = if self.sqlite {
            let dir = tempfile::TempDir::new().map_err(BotError::storage)?;
            let db_path = dir.path().join("test.db");
            let store = SqliteUserStore::new(StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                wal_mode: true,
            });
            store.initialize().await?;
            temp_dir = Some(dir);
            Arc::new(store)
        } else {
            let store = Arc::new(InMemoryUserStore::new().with_strict_transitions());
            memory = Some(store.clone());
            store
        };

        let engine = Arc::new(ConversationEngine::new(
            store.clone(),
            Arc::new(LineFormatter::new()),
            Arc::new(FixedClock(self.today)),
            &self.config,
        ));

        Ok(TestHarness {
            engine,
            store,
            memory,
            locks: UserLocks::new(),
            config: self.config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment around one [`ConversationEngine`].
pub struct TestHarness {
    /// The engine under test.
    pub engine: Arc<ConversationEngine>,
    /// The store the engine writes to.
    pub store: Arc<dyn UserStore>,
    /// Set when the harness runs on the in-memory store, for failure injection.
    pub memory: Option<Arc<InMemoryUserStore>>,
    /// Configuration the engine was built from.
    pub config: BdaybotConfig,
    locks: UserLocks,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one turn for `user` and return the reply.
    pub async fn send(&self, user: &str, text: &str) -> Result<ReplyPayload, BotError> {
        let user_id = UserId::from(user);
        let _guard = self.locks.lock(&user_id).await;
        self.engine.receive_message_and_reply(&user_id, text).await
    }

    /// The stored record for `user`, if any.
    pub async fn user(&self, user: &str) -> Result<Option<User>, BotError> {
        self.store.get_user_by_id(&UserId::from(user)).await
    }

    /// The persisted state for `user`; `Initial` when no record exists.
    pub async fn state(&self, user: &str) -> Result<ConversationState, BotError> {
        Ok(self.user(user).await?.map(|u| u.state).unwrap_or_default())
    }
}
