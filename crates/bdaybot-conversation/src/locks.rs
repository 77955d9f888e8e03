// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user turn serialization.

use std::collections::HashMap;
use std::sync::Arc;

use bdaybot_core::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Idle entries are pruned once the map grows past this many users.
const PRUNE_THRESHOLD: usize = 1024;

/// Keyed async mutexes, one per user.
///
/// Holding the guard returned by [`UserLocks::lock`] for the whole turn makes
/// the engine's read-then-write sequence single-flight per user, while turns
/// for different users still run concurrently.
#[derive(Debug, Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn for `user_id` is in progress.
    pub async fn lock(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().await;
            if map.len() >= PRUNE_THRESHOLD {
                map.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            map.entry(user_id.clone()).or_default().clone()
        };
        entry.lock_owned().await
    }

    /// Number of users currently tracked.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
