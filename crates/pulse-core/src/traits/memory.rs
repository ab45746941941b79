// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence seam for the cognitive memory list.

use async_trait::async_trait;

use crate::error::PulseError;
use crate::types::MemoryEntry;

/// Loads and saves the ordered list of learned memory entries.
///
/// Implementations must preserve order. `save` replaces the whole list;
/// there is no per-entry update or delete.
#[async_trait]
pub trait MemoryVault: Send + Sync + 'static {
    /// Returns every stored entry, oldest first.
    async fn load(&self) -> Result<Vec<MemoryEntry>, PulseError>;

    /// Replaces the stored list with `entries`.
    async fn save(&self, entries: &[MemoryEntry]) -> Result<(), PulseError>;
}
