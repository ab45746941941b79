// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for `streamGenerateContent?alt=sse` responses.
//!
//! Gemini sends unnamed events whose `data:` line is a complete
//! [`GenerateContentResponse`] JSON object. An error envelope in place of a
//! chunk ends the stream with a provider error.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use pulse_core::PulseError;

use crate::types::{GenerateContentResponse, StreamPayload};

/// Stream of decoded response chunks.
pub type ChunkStream =
    Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, PulseError>> + Send>>;

/// Parses a reqwest streaming response into decoded chunks.
///
/// Empty `data:` lines are skipped. A malformed payload or an error
/// envelope yields `Err`.
pub fn parse_sse_stream(response: reqwest::Response) -> ChunkStream {
    let events = response.bytes_stream().eventsource();

    let mapped = events.filter_map(|result| async move {
        match result {
            Ok(event) => {
                let data = event.data.trim();
                if data.is_empty() {
                    return None;
                }
                Some(decode_payload(data))
            }
            Err(e) => Some(Err(PulseError::provider(format!("SSE stream error: {e}")))),
        }
    });

    Box::pin(mapped)
}

fn decode_payload(data: &str) -> Result<GenerateContentResponse, PulseError> {
    let payload: StreamPayload =
        serde_json::from_str(data).map_err(|e| PulseError::Provider {
            message: format!("failed to parse stream chunk: {e}"),
            source: Some(Box::new(e)),
        })?;
    match payload {
        StreamPayload::Chunk(chunk) => Ok(chunk),
        StreamPayload::Error(err) => Err(PulseError::provider(err.error.to_string())),
    }
}
