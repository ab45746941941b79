// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for the Pulse assistant.
//!
//! This crate implements [`ProviderAdapter`] over the Gemini
//! `streamGenerateContent` endpoint, decoding its SSE stream into
//! [`ProviderStreamChunk`]s.

pub mod client;
pub mod sse;
pub mod types;

use async_trait::async_trait;
use futures::stream::StreamExt;
use pulse_config::PulseConfig;
use pulse_core::error::PulseError;
use pulse_core::traits::{PluginAdapter, ProviderAdapter, ProviderStream};
use pulse_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderStreamChunk, TurnRole,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ThinkingConfig,
};

/// Environment variables consulted, in order, when the config has no key.
const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` -> `API_KEY` -> error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a provider from the `[gemini]` section of the configuration.
    pub fn new(config: &PulseConfig) -> Result<Self, PulseError> {
        let api_key = resolve_api_key(config.gemini.api_key.as_deref(), |name| {
            std::env::var(name).ok()
        })?;
        let client = GeminiClient::new(
            &api_key,
            config.gemini.model.clone(),
            config.gemini.base_url.clone(),
        )?;

        info!(model = %config.gemini.model, "Gemini provider initialized");
        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, PulseError> {
        // No cheap authenticated ping exists that does not spend quota.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PulseError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, PulseError> {
        let api_request = to_generate_request(&request);
        let chunks = self
            .client
            .stream_generate(&request.model, &api_request)
            .await?;

        let mapped = chunks.map(|result| result.map(to_stream_chunk));
        Ok(Box::pin(mapped))
    }
}

/// Converts a [`ProviderRequest`] into the Gemini wire request.
pub fn to_generate_request(request: &ProviderRequest) -> GenerateContentRequest {
    let contents = request
        .turns
        .iter()
        .map(|turn| {
            let role = match turn.role {
                TurnRole::User => "user",
                TurnRole::Model => "model",
            };
            Content::text(Some(role), turn.content.clone())
        })
        .collect();

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content::text(None, request.system_instruction.clone())),
        generation_config: Some(GenerationConfig {
            temperature: request.temperature,
            thinking_config: ThinkingConfig {
                thinking_budget: request.thinking_budget,
            },
        }),
    }
}

fn to_stream_chunk(response: GenerateContentResponse) -> ProviderStreamChunk {
    if let Some(usage) = &response.usage_metadata {
        debug!(
            prompt_tokens = usage.prompt_token_count,
            output_tokens = usage.candidates_token_count,
            thought_tokens = usage.thoughts_token_count,
            "Gemini usage update"
        );
    }
    ProviderStreamChunk {
        text: response.text(),
        finish_reason: response.finish_reason().map(str::to_owned),
    }
}

/// Resolves the API key from config, then from the environment via `lookup`.
fn resolve_api_key(
    config_key: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, PulseError> {
    if let Some(key) = config_key.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    API_KEY_ENV_VARS
        .iter()
        .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
        .ok_or_else(|| {
            PulseError::Config(
                "Gemini API key not found. Set gemini.api_key in config or the GEMINI_API_KEY environment variable.".into(),
            )
        })
}
