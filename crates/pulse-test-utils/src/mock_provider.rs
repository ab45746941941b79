// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

use pulse_core::traits::{PluginAdapter, ProviderAdapter, ProviderStream};
use pulse_core::types::{AdapterType, HealthStatus, ProviderRequest, ProviderStreamChunk};
use pulse_core::PulseError;

/// Text streamed when the script is exhausted.
pub const DEFAULT_REPLY: &str = "mock response";

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Stream these fragments, then end normally.
    Fragments(Vec<String>),
    /// Fail the `stream` call itself.
    RejectRequest(String),
    /// Stream these fragments, then fail with the message.
    FailAfter(Vec<String>, String),
    /// Stream these fragments, then a text-less chunk carrying the finish reason.
    FinishWith(Vec<String>, String),
}

impl MockReply {
    pub fn fragments<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(parts.into_iter().map(Into::into).collect())
    }
}

/// A mock provider that replays scripted replies in FIFO order.
///
/// Every fragment is preceded by `chunk_delay`, which makes throughput
/// deterministic under a paused tokio clock. All requests are captured.
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    chunk_delay: Duration,
}

impl MockProvider {
    /// Create a new mock provider with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            chunk_delay: Duration::ZERO,
        }
    }

    /// Create a mock provider that answers each request with one full text.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_script(
            responses
                .into_iter()
                .map(|r| MockReply::Fragments(vec![r]))
                .collect(),
        )
    }

    pub fn with_script(script: Vec<MockReply>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(script))),
            ..Self::new()
        }
    }

    /// Sleep this long before yielding each fragment.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Add a reply to the end of the script.
    pub async fn push(&self, reply: MockReply) {
        self.script.lock().await.push_back(reply);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().await.last().cloned()
    }

    async fn next_reply(&self) -> MockReply {
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::fragments([DEFAULT_REPLY]))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, PulseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PulseError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, PulseError> {
        self.requests.lock().await.push(request);

        let (fragments, tail) = match self.next_reply().await {
            MockReply::Fragments(parts) => (parts, None),
            MockReply::RejectRequest(message) => return Err(PulseError::provider(message)),
            MockReply::FailAfter(parts, message) => (parts, Some(Err(PulseError::provider(message)))),
            MockReply::FinishWith(parts, reason) => (
                parts,
                Some(Ok(ProviderStreamChunk {
                    text: None,
                    finish_reason: Some(reason),
                })),
            ),
        };

        let items = fragments
            .into_iter()
            .map(|f| Ok(ProviderStreamChunk::text(f)))
            .chain(tail);

        let delay = self.chunk_delay;
        let stream = stream::iter(items).then(move |item| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            item
        });
        Ok(Box::pin(stream))
    }
}
