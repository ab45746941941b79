// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The staged response pipeline.
//!
//! Every run walks three stages:
//!
//! 1. **Intent decomposition**: a fixed hold, shown against the reasoning model.
//! 2. **Identity memory sync**: keyword recall from the cognitive memory vault,
//!    followed by a fixed hold.
//! 3. **Generation**: the history is streamed through the provider, with a
//!    running tokens/sec estimate on every fragment.
//!
//! Progress is reported as [`PipelineEvent`]s over an unbounded channel so a
//! slow consumer never stalls the stream. A dropped receiver does not stop
//! the run. After a successful run, long responses are learned from in a
//! background task.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use pulse_config::{PerformanceProfile, PulseConfig};
use pulse_core::error::PulseError;
use pulse_core::traits::ProviderAdapter;
use pulse_core::types::{ChatMessage, ProviderRequest};
use pulse_memory::{CognitiveMemory, Recall};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::events::PipelineEvent;
use crate::prompt::{self, GenerationSettings};
use crate::steps::StepTracker;
use crate::throughput::ThroughputMeter;

/// Per-run settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Catalog id shown on the intent step.
    pub reasoning_model_id: String,
    /// Catalog id shown on the generation step and in the system instruction.
    pub generalist_model_id: String,
    /// Model the provider is actually asked to run.
    pub remote_model: String,
    pub profile: PerformanceProfile,
    pub use_cognitive_memory: bool,
    pub intent_delay: Duration,
    pub memory_sync_delay: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &PulseConfig) -> Self {
        Self {
            reasoning_model_id: config.assistant.reasoning_model_id.clone(),
            generalist_model_id: config.assistant.active_model_id.clone(),
            remote_model: config.gemini.model.clone(),
            profile: config.assistant.profile,
            use_cognitive_memory: config.assistant.use_cognitive_memory,
            intent_delay: Duration::from_millis(config.pipeline.intent_delay_ms),
            memory_sync_delay: Duration::from_millis(config.pipeline.memory_sync_delay_ms),
        }
    }
}

/// Output of a successful generation stage.
struct Completion {
    full_text: String,
    sources: Vec<String>,
    finish_reason: Option<String>,
}

/// Drives the three-stage pipeline for one request at a time.
///
/// Cheap to clone; concurrent runs share the provider and memory vault.
#[derive(Clone)]
pub struct ResponseOrchestrator {
    provider: Arc<dyn ProviderAdapter>,
    memory: CognitiveMemory,
    settings: PipelineSettings,
}

impl ResponseOrchestrator {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        memory: CognitiveMemory,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            provider,
            memory,
            settings,
        }
    }

    /// Starts a run on a new task and returns its event receiver.
    pub fn spawn(&self, history: Vec<ChatMessage>) -> mpsc::UnboundedReceiver<PipelineEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let orchestrator = self.clone();
        tokio::spawn(async move {
            orchestrator.run(&history, &tx).await;
        });
        rx
    }

    /// Runs the pipeline to completion, sending events to `tx`.
    ///
    /// Ends with exactly one `Complete` or `Error` event. Returns the handle
    /// of the background learning task when one was started.
    pub async fn run(
        &self,
        history: &[ChatMessage],
        tx: &mpsc::UnboundedSender<PipelineEvent>,
    ) -> Option<JoinHandle<()>> {
        // An empty history still runs every stage with an empty query.
        let query = history
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        match self.execute(history, &query, tx).await {
            Ok(Completion {
                full_text,
                sources,
                finish_reason,
            }) => {
                info!(
                    chars = full_text.chars().count(),
                    personalized = !sources.is_empty(),
                    finish_reason = finish_reason.as_deref().unwrap_or("none"),
                    "response complete"
                );
                emit(
                    tx,
                    PipelineEvent::Complete {
                        full_text: full_text.clone(),
                        sources,
                    },
                );
                self.memory.learn_in_background(query, full_text)
            }
            Err(e) => {
                warn!(error = %e, "response pipeline failed");
                emit(tx, PipelineEvent::Error(e));
                None
            }
        }
    }

    async fn execute(
        &self,
        history: &[ChatMessage],
        query: &str,
        tx: &mpsc::UnboundedSender<PipelineEvent>,
    ) -> Result<Completion, PulseError> {
        let settings = &self.settings;
        let mut steps = StepTracker::new(
            &settings.reasoning_model_id,
            &settings.generalist_model_id,
        );

        emit(tx, PipelineEvent::Steps(steps.start()));
        debug!(delay_ms = settings.intent_delay.as_millis() as u64, "stage 0: intent decomposition");
        tokio::time::sleep(settings.intent_delay).await;
        emit(tx, PipelineEvent::Steps(steps.advance()));

        let recall = if settings.use_cognitive_memory {
            self.memory.recall(query).await
        } else {
            Recall::default()
        };
        debug!(
            enabled = settings.use_cognitive_memory,
            personalized = !recall.is_empty(),
            "stage 1: identity memory sync"
        );
        tokio::time::sleep(settings.memory_sync_delay).await;
        emit(tx, PipelineEvent::Steps(steps.advance()));

        let generation = GenerationSettings::for_profile(settings.profile);
        let request = ProviderRequest {
            model: settings.remote_model.clone(),
            turns: prompt::to_generation_turns(history),
            system_instruction: prompt::system_instruction(
                prompt::engine_name(&settings.generalist_model_id),
                &recall.context,
            ),
            temperature: generation.temperature,
            thinking_budget: generation.thinking_budget,
        };
        debug!(
            model = %request.model,
            turns = request.turns.len(),
            temperature = request.temperature,
            thinking_budget = request.thinking_budget,
            "stage 2: generation"
        );

        let mut meter = ThroughputMeter::start();
        let mut stream = self.provider.stream(request).await?;
        let mut full_text = String::new();
        let mut finish_reason = None;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if chunk.finish_reason.is_some() {
                finish_reason = chunk.finish_reason;
            }
            let Some(fragment) = chunk.text.filter(|t| !t.is_empty()) else {
                continue;
            };
            full_text.push_str(&fragment);
            let tokens_per_sec = meter.record(&fragment);
            emit(
                tx,
                PipelineEvent::Token {
                    fragment,
                    tokens_per_sec,
                },
            );
        }

        emit(tx, PipelineEvent::Steps(steps.advance()));
        Ok(Completion {
            full_text,
            sources: recall.sources,
            finish_reason,
        })
    }
}

/// Sends an event, ignoring a receiver that has gone away.
fn emit(tx: &mpsc::UnboundedSender<PipelineEvent>, event: PipelineEvent) {
    let _ = tx.send(event);
}
