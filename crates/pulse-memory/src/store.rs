// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, insertion-ordered collection of learned memory entries.

use std::collections::VecDeque;

use pulse_core::types::MemoryEntry;

/// Maximum number of entries kept in the vault.
pub const MEMORY_CAPACITY: usize = 30;

/// Ordered memory entries, oldest first, never longer than [`MEMORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    entries: VecDeque<MemoryEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from persisted entries.
    ///
    /// A vault written by an older build may hold more than the cap; only the
    /// newest [`MEMORY_CAPACITY`] entries are kept.
    pub fn from_entries(entries: Vec<MemoryEntry>) -> Self {
        let mut entries = VecDeque::from(entries);
        while entries.len() > MEMORY_CAPACITY {
            entries.pop_front();
        }
        Self { entries }
    }

    /// Appends an entry, evicting and returning the oldest one on overflow.
    pub fn push(&mut self, entry: MemoryEntry) -> Option<MemoryEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > MEMORY_CAPACITY {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    /// Copies the entries out in insertion order, ready for `MemoryVault::save`.
    pub fn to_vec(&self) -> Vec<MemoryEntry> {
        self.entries.iter().cloned().collect()
    }
}
