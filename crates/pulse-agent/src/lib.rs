// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response orchestration and chat session management for Pulse.
//!
//! The [`ChatAgent`] ties the pieces together for one conversational turn:
//! - Persists the user message (titling new sessions)
//! - Runs the [`ResponseOrchestrator`] over the session history
//! - Forwards every [`PipelineEvent`] to the caller as it arrives
//! - Persists the completed assistant reply

pub mod events;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod steps;
pub mod throughput;

pub use events::PipelineEvent;
pub use orchestrator::{PipelineSettings, ResponseOrchestrator};
pub use session::{ChatSessionManager, DEFAULT_SESSION_TITLE};
pub use steps::StepTracker;

use pulse_core::error::PulseError;
use pulse_core::types::ChatMessage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of a completed turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The persisted assistant reply.
    pub reply: ChatMessage,
    /// Background learning task, if the reply was long enough to learn from.
    pub learning: Option<JoinHandle<()>>,
}

/// Runs conversational turns against persisted sessions.
#[derive(Clone)]
pub struct ChatAgent {
    sessions: ChatSessionManager,
    orchestrator: ResponseOrchestrator,
}

impl ChatAgent {
    pub fn new(sessions: ChatSessionManager, orchestrator: ResponseOrchestrator) -> Self {
        Self {
            sessions,
            orchestrator,
        }
    }

    pub fn sessions(&self) -> &ChatSessionManager {
        &self.sessions
    }

    /// Sends `text` in `session_id` and streams the pipeline events to `observe`.
    ///
    /// On a pipeline error nothing is persisted for the assistant and the
    /// error is returned after `observe` has seen it.
    pub async fn send(
        &self,
        session_id: &str,
        text: &str,
        mut observe: impl FnMut(&PipelineEvent),
    ) -> Result<TurnOutcome, PulseError> {
        self.sessions.record_user_message(session_id, text).await?;
        let history = self.sessions.messages(session_id).await?;
        debug!(session_id, turns = history.len(), "running response pipeline");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let pipeline = self.orchestrator.run(&history, &tx);
        let consume = async {
            let mut last_rate = None;
            while let Some(event) = rx.recv().await {
                observe(&event);
                match event {
                    PipelineEvent::Token { tokens_per_sec, .. } => {
                        last_rate = Some(tokens_per_sec);
                    }
                    PipelineEvent::Complete { full_text, sources } => {
                        return Ok((full_text, sources, last_rate));
                    }
                    PipelineEvent::Error(e) => return Err(e),
                    PipelineEvent::Steps(_) => {}
                }
            }
            Err(PulseError::Internal(
                "response pipeline ended without a result".into(),
            ))
        };
        let (learning, result) = tokio::join!(pipeline, consume);

        let (full_text, sources, tokens_per_sec) = match result {
            Ok(done) => done,
            Err(e) => {
                warn!(session_id, error = %e, "turn failed, reply not persisted");
                return Err(e);
            }
        };
        let reply = self
            .sessions
            .record_assistant_message(session_id, &full_text, sources, tokens_per_sec)
            .await?;
        Ok(TurnOutcome { reply, learning })
    }
}
