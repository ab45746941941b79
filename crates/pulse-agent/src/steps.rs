// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reasoning step tracking for the three-stage response pipeline.
//!
//! Steps advance strictly in order: the active step completes and the next
//! pending one becomes active. A step never jumps from pending to complete.

use pulse_config::find_model;
use pulse_core::types::{ReasoningStep, StepStatus};

/// Number of stages every pipeline run walks through.
pub const STEP_COUNT: usize = 3;

const MEMORY_SYNC_LABEL: &str = "Identity Memory Sync";

/// The three reasoning steps of one pipeline run.
#[derive(Debug, Clone)]
pub struct StepTracker {
    steps: [ReasoningStep; STEP_COUNT],
}

impl StepTracker {
    /// Builds pending steps labelled after the configured catalog models.
    ///
    /// Ids missing from the catalog are shown verbatim.
    pub fn new(reasoning_model_id: &str, generalist_model_id: &str) -> Self {
        Self {
            steps: [
                ReasoningStep::pending(format!(
                    "Intent Decomposition ({})",
                    short_name(reasoning_model_id)
                )),
                ReasoningStep::pending(MEMORY_SYNC_LABEL),
                ReasoningStep::pending(format!(
                    "Architecture Refinement ({})",
                    short_name(generalist_model_id)
                )),
            ],
        }
    }

    /// Activates the first step and returns the snapshot.
    pub fn start(&mut self) -> Vec<ReasoningStep> {
        self.steps[0].status = StepStatus::Active;
        self.snapshot()
    }

    /// Completes the active step, activates the next one, and returns the snapshot.
    ///
    /// Calling this once everything is complete is a no-op.
    pub fn advance(&mut self) -> Vec<ReasoningStep> {
        if let Some(idx) = self
            .steps
            .iter()
            .position(|s| s.status == StepStatus::Active)
        {
            self.steps[idx].status = StepStatus::Complete;
            if let Some(next) = self.steps.get_mut(idx + 1) {
                next.status = StepStatus::Active;
            }
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> Vec<ReasoningStep> {
        self.steps.to_vec()
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Complete)
    }
}

fn short_name(model_id: &str) -> &str {
    find_model(model_id).map_or(model_id, |m| m.short_name)
}
