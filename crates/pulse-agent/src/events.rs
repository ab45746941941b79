// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events emitted by a pipeline run.

use pulse_core::error::PulseError;
use pulse_core::types::ReasoningStep;

/// Progress and output of one response pipeline run.
///
/// A run emits step snapshots and tokens, then ends with exactly one
/// `Complete` or one `Error`. Nothing follows the terminal event.
#[derive(Debug)]
pub enum PipelineEvent {
    /// Full snapshot of the three reasoning steps.
    Steps(Vec<ReasoningStep>),
    /// A streamed text fragment and the running throughput estimate.
    Token { fragment: String, tokens_per_sec: u32 },
    /// The accumulated response and the context sources used.
    Complete { full_text: String, sources: Vec<String> },
    Error(PulseError),
}

impl PipelineEvent {
    /// Returns true for `Complete` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error(_))
    }
}
