// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete assistant stack with a mock provider
//! and a temp SQLite database serving as both session storage and memory
//! vault. `send_message()` drives a full turn through the pipeline.

use std::sync::Arc;
use std::time::Duration;

use pulse_agent::{
    ChatAgent, ChatSessionManager, PipelineEvent, PipelineSettings, ResponseOrchestrator,
};
use pulse_config::model::StorageConfig;
use pulse_config::{PerformanceProfile, PulseConfig};
use pulse_core::types::{ChatSession, MemoryEntry};
use pulse_core::{MemoryVault, PulseError, StorageAdapter};
use pulse_memory::CognitiveMemory;
use pulse_storage::SqliteStorage;

use crate::mock_provider::{MockProvider, MockReply};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    script: Vec<MockReply>,
    chunk_delay: Duration,
    profile: PerformanceProfile,
    use_cognitive_memory: bool,
    stage_delays: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            script: Vec::new(),
            chunk_delay: Duration::ZERO,
            profile: PerformanceProfile::default(),
            use_cognitive_memory: true,
            stage_delays: false,
        }
    }

    /// Set mock provider responses, one full text per request.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.script = responses
            .into_iter()
            .map(|r| MockReply::Fragments(vec![r]))
            .collect();
        self
    }

    pub fn with_script(mut self, script: Vec<MockReply>) -> Self {
        self.script = script;
        self
    }

    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    pub fn with_profile(mut self, profile: PerformanceProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_cognitive_memory(mut self, enabled: bool) -> Self {
        self.use_cognitive_memory = enabled;
        self
    }

    /// Keep the configured 700ms/300ms stage holds. Off by default.
    pub fn with_stage_delays(mut self) -> Self {
        self.stage_delays = true;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, PulseError> {
        let temp_dir = tempfile::TempDir::new().map_err(PulseError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = PulseConfig {
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().into_owned(),
                wal_mode: true,
            },
            ..PulseConfig::default()
        };
        config.assistant.profile = self.profile;
        config.assistant.use_cognitive_memory = self.use_cognitive_memory;
        if !self.stage_delays {
            config.pipeline.intent_delay_ms = 0;
            config.pipeline.memory_sync_delay_ms = 0;
        }

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;

        let provider =
            Arc::new(MockProvider::with_script(self.script).with_chunk_delay(self.chunk_delay));

        let vault: Arc<dyn MemoryVault> = storage.clone();
        let orchestrator = ResponseOrchestrator::new(
            provider.clone(),
            CognitiveMemory::new(vault),
            PipelineSettings::from_config(&config),
        );
        let agent = ChatAgent::new(ChatSessionManager::new(storage.clone()), orchestrator);

        Ok(TestHarness {
            provider,
            storage,
            agent,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock provider and temp storage.
pub struct TestHarness {
    /// The mock generation provider.
    pub provider: Arc<MockProvider>,
    /// SQLite storage (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    pub agent: ChatAgent,
    pub config: PulseConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Create a session bound to the configured generalist model.
    pub async fn new_session(&self) -> Result<ChatSession, PulseError> {
        self.agent
            .sessions()
            .create(&self.config.assistant.active_model_id)
            .await
    }

    /// Send a message and return the reply text.
    ///
    /// Waits for background learning so the vault is settled on return.
    pub async fn send_message(&self, session_id: &str, text: &str) -> Result<String, PulseError> {
        Ok(self.send_collecting(session_id, text).await?.0)
    }

    /// Like [`send_message`](Self::send_message) but also returns every
    /// observed pipeline event.
    pub async fn send_collecting(
        &self,
        session_id: &str,
        text: &str,
    ) -> Result<(String, Vec<PipelineEvent>), PulseError> {
        let mut events = Vec::new();
        let outcome = self
            .agent
            .send(session_id, text, |event| events.push(clone_event(event)))
            .await?;
        if let Some(learning) = outcome.learning {
            learning
                .await
                .map_err(|e| PulseError::Internal(format!("learning task failed: {e}")))?;
        }
        Ok((outcome.reply.content, events))
    }

    /// Entries currently in the memory vault.
    pub async fn memories(&self) -> Result<Vec<MemoryEntry>, PulseError> {
        self.storage.load().await
    }
}

/// Copies an event; errors are reduced to their message.
fn clone_event(event: &PipelineEvent) -> PipelineEvent {
    match event {
        PipelineEvent::Steps(steps) => PipelineEvent::Steps(steps.clone()),
        PipelineEvent::Token {
            fragment,
            tokens_per_sec,
        } => PipelineEvent::Token {
            fragment: fragment.clone(),
            tokens_per_sec: *tokens_per_sec,
        },
        PipelineEvent::Complete { full_text, sources } => PipelineEvent::Complete {
            full_text: full_text.clone(),
            sources: sources.clone(),
        },
        PipelineEvent::Error(e) => PipelineEvent::Error(PulseError::Internal(e.to_string())),
    }
}
