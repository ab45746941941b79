// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory memory vault with injectable failures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use pulse_core::traits::MemoryVault;
use pulse_core::types::MemoryEntry;
use pulse_core::PulseError;

/// A [`MemoryVault`] backed by a `Vec`.
#[derive(Default)]
pub struct InMemoryVault {
    entries: Mutex<Vec<MemoryEntry>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vault pre-populated with `entries`.
    pub fn with_entries(entries: Vec<MemoryEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Make every subsequent `load` fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `save` fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub async fn entries(&self) -> Vec<MemoryEntry> {
        self.entries.lock().await.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MemoryVault for InMemoryVault {
    async fn load(&self) -> Result<Vec<MemoryEntry>, PulseError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(PulseError::storage(std::io::Error::other("vault unreadable")));
        }
        Ok(self.entries.lock().await.clone())
    }

    async fn save(&self, entries: &[MemoryEntry]) -> Result<(), PulseError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PulseError::storage(std::io::Error::other("vault read-only")));
        }
        *self.entries.lock().await = entries.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
