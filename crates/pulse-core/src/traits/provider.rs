// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for remote generation APIs.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::PulseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderStreamChunk};

/// Boxed stream of provider chunks. Finite, not restartable; a failure is
/// delivered as an `Err` item and nothing useful follows it.
pub type ProviderStream =
    Pin<Box<dyn Stream<Item = Result<ProviderStreamChunk, PulseError>> + Send>>;

/// Adapter for remote generation providers.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a generation request and returns a stream of response chunks.
    async fn stream(&self, request: ProviderRequest) -> Result<ProviderStream, PulseError>;
}
