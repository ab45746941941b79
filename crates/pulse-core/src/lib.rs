// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Pulse assistant.
//!
//! This crate provides the trait definitions, error type, and common types
//! shared by every other crate in the workspace. Provider, storage and
//! memory-vault adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PulseError;
pub use types::{
    AdapterType, ChatMessage, ChatSession, GenerationTurn, HealthStatus, MemoryEntry, MemoryKind,
    ProviderRequest, ProviderStreamChunk, ReasoningStep, Role, StepStatus, TurnRole,
};

pub use traits::{MemoryVault, PluginAdapter, ProviderAdapter, ProviderStream, StorageAdapter};
