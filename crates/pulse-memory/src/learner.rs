// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cognitive memory facade over a [`MemoryVault`].
//!
//! Every operation loads the vault fresh. Learning is load, append, save with
//! no lock held across requests, so two overlapping learns are
//! last-write-wins.

use std::sync::Arc;

use pulse_core::error::PulseError;
use pulse_core::traits::MemoryVault;
use pulse_core::types::MemoryEntry;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::classifier;
use crate::retriever;
use crate::store::MemoryStore;

/// Responses must be longer than this many characters to be learned from.
pub const MIN_LEARNABLE_RESPONSE_CHARS: usize = 150;

/// Source label attached to replies personalized from memory.
pub const IDENTITY_VAULT_SOURCE: &str = "Identity Vault";

/// Context header prepended to recalled entry texts.
const CONTEXT_PREFIX: &str = "USER STYLE/PREFS FOUND: ";

/// What memory contributes to one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recall {
    /// Personal context for the system instruction; empty when nothing matched.
    pub context: String,
    pub sources: Vec<String>,
}

impl Recall {
    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }
}

/// Returns whether a response is long enough to produce a memory entry.
pub fn should_learn(response: &str) -> bool {
    response.chars().count() > MIN_LEARNABLE_RESPONSE_CHARS
}

/// Shared handle to the persistent memory vault.
#[derive(Clone)]
pub struct CognitiveMemory {
    vault: Arc<dyn MemoryVault>,
}

impl CognitiveMemory {
    pub fn new(vault: Arc<dyn MemoryVault>) -> Self {
        Self { vault }
    }

    /// Loads the vault, treating a read failure as an empty store.
    pub async fn load_store(&self) -> MemoryStore {
        match self.vault.load().await {
            Ok(entries) => MemoryStore::from_entries(entries),
            Err(e) => {
                warn!(error = %e, "memory vault unreadable, continuing with empty store");
                MemoryStore::new()
            }
        }
    }

    /// Retrieves personal context relevant to `query`.
    pub async fn recall(&self, query: &str) -> Recall {
        let store = self.load_store().await;
        let texts = retriever::retrieve(&store, query);
        debug!(matches = texts.len(), entries = store.len(), "memory recall");
        if texts.is_empty() {
            return Recall::default();
        }
        Recall {
            context: format!("{CONTEXT_PREFIX}{}", texts.join(" | ")),
            sources: vec![IDENTITY_VAULT_SOURCE.to_string()],
        }
    }

    /// Classifies the interaction and appends it to the vault.
    pub async fn learn(&self, query: &str, response: &str) -> Result<MemoryEntry, PulseError> {
        let mut store = self.load_store().await;
        let entry = classifier::new_entry(query, response);
        if let Some(evicted) = store.push(entry.clone()) {
            debug!(evicted_id = %evicted.id, "memory vault full, evicted oldest entry");
        }
        self.vault.save(&store.to_vec()).await?;
        info!(
            entry_id = %entry.id,
            kind = %entry.kind,
            importance = entry.importance,
            "learned from interaction"
        );
        Ok(entry)
    }

    /// Spawns [`learn`](Self::learn) when the response is long enough.
    ///
    /// Failures are logged and never returned. The handle is only useful to
    /// callers (mostly tests) that want to wait for the write.
    pub fn learn_in_background(&self, query: String, response: String) -> Option<JoinHandle<()>> {
        if !should_learn(&response) {
            debug!(chars = response.chars().count(), "response too short to learn from");
            return None;
        }
        let memory = self.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = memory.learn(&query, &response).await {
                warn!(error = %e, "learning from interaction failed");
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pulse_core::types::MemoryKind;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct VecVault {
        entries: Mutex<Vec<MemoryEntry>>,
        fail_load: bool,
        fail_save: bool,
    }

    #[async_trait]
    impl MemoryVault for VecVault {
        async fn load(&self) -> Result<Vec<MemoryEntry>, PulseError> {
            if self.fail_load {
                return Err(PulseError::Internal("corrupt vault".into()));
            }
            Ok(self.entries.lock().await.clone())
        }

        async fn save(&self, entries: &[MemoryEntry]) -> Result<(), PulseError> {
            if self.fail_save {
                return Err(PulseError::Internal("read-only vault".into()));
            }
            *self.entries.lock().await = entries.to_vec();
            Ok(())
        }
    }

    fn memory_with(vault: Arc<VecVault>) -> CognitiveMemory {
        CognitiveMemory::new(vault)
    }

    #[test]
    fn learn_threshold_is_exclusive() {
        assert!(!should_learn(&"x".repeat(150)));
        assert!(should_learn(&"x".repeat(151)));
    }

    #[tokio::test]
    async fn recall_formats_context_and_source() {
        let vault = Arc::new(VecVault::default());
        let memory = memory_with(vault.clone());
        memory
            .learn("I prefer functional style", "Noted, I will favor iterators.")
            .await
            .unwrap();

        let recall = memory.recall("show functional code").await;
        assert!(recall.context.starts_with("USER STYLE/PREFS FOUND: Context: I prefer"));
        assert_eq!(recall.sources, vec!["Identity Vault"]);
    }

    #[tokio::test]
    async fn recall_joins_multiple_matches() {
        let vault = Arc::new(VecVault::default());
        let memory = memory_with(vault.clone());
        memory.learn("rust lifetimes", "answer one").await.unwrap();
        memory.learn("rust traits", "answer two").await.unwrap();

        let recall = memory.recall("rust").await;
        assert_eq!(recall.context.matches(" | ").count(), 1);
    }

    #[tokio::test]
    async fn recall_without_match_is_empty() {
        let memory = memory_with(Arc::new(VecVault::default()));
        let recall = memory.recall("Explain RAG").await;
        assert!(recall.is_empty());
        assert!(recall.sources.is_empty());
    }

    #[tokio::test]
    async fn unreadable_vault_is_empty_store() {
        let vault = Arc::new(VecVault {
            fail_load: true,
            ..Default::default()
        });
        let memory = memory_with(vault.clone());
        assert!(memory.load_store().await.is_empty());

        // Learning still writes a fresh single-entry vault.
        let entry = memory.learn("Use tabs", "ok").await.unwrap();
        assert_eq!(entry.kind, MemoryKind::Preference);
        assert_eq!(vault.entries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn learn_appends_and_persists() {
        let vault = Arc::new(VecVault::default());
        let memory = memory_with(vault.clone());
        let entry = memory.learn("Explain RAG", &"r".repeat(200)).await.unwrap();

        let saved = vault.entries.lock().await.clone();
        assert_eq!(saved, vec![entry.clone()]);
        assert_eq!(entry.kind, MemoryKind::Knowledge);
        assert_eq!(
            entry.text,
            format!("Context: Explain RAG... -> Learned: {}...", "r".repeat(200))
        );
    }

    #[tokio::test]
    async fn background_learning_respects_threshold() {
        let vault = Arc::new(VecVault::default());
        let memory = memory_with(vault.clone());

        assert!(memory
            .learn_in_background("q".into(), "x".repeat(100))
            .is_none());

        memory
            .learn_in_background("q".into(), "x".repeat(200))
            .expect("spawned")
            .await
            .unwrap();
        assert_eq!(vault.entries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn background_failure_is_swallowed() {
        let vault = Arc::new(VecVault {
            fail_save: true,
            ..Default::default()
        });
        let memory = memory_with(vault);
        let handle = memory
            .learn_in_background("q".into(), "x".repeat(200))
            .expect("spawned");
        assert!(handle.await.is_ok());
    }
}
