// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory user store for deterministic tests.
//!
//! Behaves like the SQLite store (same parsing, same `UserNotFound` rules)
//! and adds switches to make the next write or every read fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use bdaybot_core::{
    AdapterType, BotError, ConversationState, HealthStatus, PluginAdapter, User, UserId,
    UserStore,
};

/// A `HashMap`-backed [`UserStore`].
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<UserId, User>>,
    strict: bool,
    fail_reads: AtomicBool,
    fail_next_birth_date: AtomicBool,
    fail_next_write: AtomicBool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects updates that skip a step of the conversation with
    /// [`BotError::Internal`].
    pub fn with_strict_transitions(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Makes every read fail with a storage error until switched off.
    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    /// Makes the next birth-date write fail with a storage error.
    pub fn fail_next_birth_date_write(&self) {
        self.fail_next_birth_date.store(true, Ordering::SeqCst);
    }

    /// Makes the next state-changing call of any kind fail with a storage error.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Stores a record as-is, bypassing transition rules.
    pub fn insert_raw(&self, user: User) {
        self.users().insert(user.id.clone(), user);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.users().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn users(&self) -> MutexGuard<'_, HashMap<UserId, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn injected(&self, flag: &AtomicBool, what: &str) -> Result<(), BotError> {
        if flag.swap(false, Ordering::SeqCst) {
            return Err(BotError::Storage {
                source: format!("injected {what} failure").into(),
            });
        }
        Ok(())
    }

    /// Applies `update` to an existing record after checking the transition.
    fn transition(
        &self,
        user_id: &UserId,
        to: ConversationState,
        update: impl FnOnce(&mut User),
    ) -> Result<(), BotError> {
        self.injected(&self.fail_next_write, "write")?;
        let mut users = self.users();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| BotError::UserNotFound {
                user_id: user_id.to_string(),
            })?;
        if self.strict && !user.state.can_transition_to(to) {
            return Err(BotError::Internal(format!(
                "illegal transition {} -> {to} for user {user_id}",
                user.state
            )));
        }
        user.state = to;
        update(user);
        user.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for InMemoryUserStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BotError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Degraded("reads failing".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), BotError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn initialize(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), BotError> {
        Ok(())
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<Option<User>, BotError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BotError::Storage {
                source: "injected read failure".into(),
            });
        }
        Ok(self.users().get(user_id).cloned())
    }

    async fn set_greetings_received_state(&self, user_id: &UserId) -> Result<(), BotError> {
        self.injected(&self.fail_next_write, "write")?;
        self.users()
            .entry(user_id.clone())
            .or_insert_with(|| User::new(user_id.clone()));
        self.transition(user_id, ConversationState::Greeted, |_| {})
    }

    async fn set_user_name_and_upgrade_state(
        &self,
        user_id: &UserId,
        name: &str,
    ) -> Result<(), BotError> {
        self.transition(user_id, ConversationState::NameKnown, |user| {
            user.name = Some(name.to_string());
        })
    }

    async fn set_birth_date_and_upgrade_state(
        &self,
        user_id: &UserId,
        date_text: &str,
    ) -> Result<(), BotError> {
        self.injected(&self.fail_next_birth_date, "birth date write")?;
        let birth_date =
            bdaybot_dates::parse_birth_date(date_text).map_err(|_| BotError::InvalidBirthDate {
                value: date_text.to_string(),
            })?;
        self.transition(user_id, ConversationState::BirthDateKnown, |user| {
            user.birth_date = Some(birth_date);
        })
    }

    async fn reset_user_state(&self, user_id: &UserId) -> Result<(), BotError> {
        self.transition(user_id, ConversationState::Initial, |_| {})
    }

    async fn list_users(&self) -> Result<Vec<User>, BotError> {
        let mut users: Vec<User> = self.users().values().cloned().collect();
        users.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn greeting_creates_record() {
        let store = InMemoryUserStore::new();
        let id = UserId::from("U1");
        store.set_greetings_received_state(&id).await.unwrap();
        let user = store.get_user_by_id(&id).await.unwrap().unwrap();
        assert_eq!(user.state, ConversationState::Greeted);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn updates_require_existing_record() {
        let store = InMemoryUserStore::new();
        let err = store
            .set_user_name_and_upgrade_state(&UserId::from("ghost"), "Alex")
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn strict_mode_rejects_skipped_steps() {
        let store = InMemoryUserStore::new().with_strict_transitions();
        let id = UserId::from("U1");
        store.set_greetings_received_state(&id).await.unwrap();
        let err = store
            .set_birth_date_and_upgrade_state(&id, "1990-05-20")
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Internal(_)));
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let store = InMemoryUserStore::new();
        let id = UserId::from("U1");
        store.fail_next_write();
        assert!(store.set_greetings_received_state(&id).await.is_err());
        assert!(store.set_greetings_received_state(&id).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_birth_date_is_rejected() {
        let store = InMemoryUserStore::new();
        let id = UserId::from("U1");
        store.set_greetings_received_state(&id).await.unwrap();
        store.set_user_name_and_upgrade_state(&id, "Alex").await.unwrap();
        let err = store
            .set_birth_date_and_upgrade_state(&id, "2023-02-29")
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::InvalidBirthDate { .. }));
    }
}
