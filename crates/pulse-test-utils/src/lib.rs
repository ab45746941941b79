// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Pulse integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without network access.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock generation provider with scripted, optionally delayed replies
//! - [`InMemoryVault`] - Memory vault with injectable load/save failures
//! - [`TestHarness`] - Full assistant stack over a temp SQLite database

pub mod harness;
pub mod mock_provider;
pub mod mock_vault;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{MockProvider, MockReply, DEFAULT_REPLY};
pub use mock_vault::InMemoryVault;
