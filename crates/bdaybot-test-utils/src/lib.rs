// SPDX-FileCopyrightText: 2026 Bdaybot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for birthday bot integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic tests without a chat platform.
//!
//! # Components
//!
//! - [`InMemoryUserStore`] - User store with failure injection
//! - [`MockChannel`] - Mock messaging channel with message injection and capture
//! - [`TestHarness`] - Engine wired to a store, LINE formatter and fixed clock

pub mod harness;
pub mod memory_store;
pub mod mock_channel;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::InMemoryUserStore;
pub use mock_channel::MockChannel;
