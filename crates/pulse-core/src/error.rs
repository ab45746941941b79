// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Pulse assistant.

use thiserror::Error;

/// The primary error type used across all Pulse adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PulseError {
    /// Configuration errors (missing API key, invalid header values, unknown model ids).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generation provider errors (HTTP failure, API error body, broken stream).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PulseError {
    /// Shorthand for a provider error with no underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        PulseError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PulseError::Storage {
            source: Box::new(err),
        }
    }
}
