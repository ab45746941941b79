// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Running tokens-per-second estimate for streamed text.
//!
//! Tokens are approximated as `chars / 4`. The estimate is a display figure,
//! not a tokenizer count.

use std::time::Duration;

use tokio::time::Instant;

const CHARS_PER_TOKEN: f64 = 4.0;

/// Smallest elapsed time used as a divisor.
const MIN_ELAPSED: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct ThroughputMeter {
    started: Instant,
    estimated_tokens: f64,
}

impl ThroughputMeter {
    /// Starts the clock now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            estimated_tokens: 0.0,
        }
    }

    /// Records a fragment and returns the rounded tokens/sec since start.
    pub fn record(&mut self, fragment: &str) -> u32 {
        self.estimated_tokens += fragment.chars().count() as f64 / CHARS_PER_TOKEN;
        self.rate_at(self.started.elapsed())
    }

    fn rate_at(&self, elapsed: Duration) -> u32 {
        let secs = elapsed.max(MIN_ELAPSED).as_secs_f64();
        (self.estimated_tokens / secs).round() as u32
    }

    #[cfg(test)]
    fn estimated_tokens(&self) -> f64 {
        self.estimated_tokens
    }
}
