// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! Provides [`GeminiClient`] which handles request construction,
//! authentication and streaming SSE responses. Requests are attempted once;
//! a failed call surfaces as a single provider error.

use std::time::Duration;

use pulse_core::PulseError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::sse::{self, ChunkStream};
use crate::types::{ApiErrorResponse, GenerateContentRequest};

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    default_model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client authenticating with `x-goog-api-key`.
    ///
    /// `base_url` is the API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(api_key: &str, model: String, base_url: String) -> Result<Self, PulseError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| PulseError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| PulseError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            default_model: model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:streamGenerateContent?alt=sse",
            self.base_url
        )
    }

    /// Sends a streaming request and returns the decoded chunk stream.
    ///
    /// An empty `model` falls back to the client's default model.
    pub async fn stream_generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream, PulseError> {
        let model = if model.is_empty() {
            self.default_model.as_str()
        } else {
            model
        };

        let response = self
            .client
            .post(self.stream_url(model))
            .json(request)
            .send()
            .await
            .map_err(|e| PulseError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model, "streaming response received");

        if status.is_success() {
            return Ok(sse::parse_sse_stream(response));
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => api_err.error.to_string(),
            Err(_) => format!("API returned {status}: {body}"),
        };
        Err(PulseError::provider(message))
    }
}
