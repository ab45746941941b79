// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Pulse workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

// --- Conversation types ---

/// Author of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single message in a chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Throughput reported while the message streamed (assistant only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_per_sec: Option<u32>,
    /// Context sources that personalized this reply (e.g. "Identity Vault").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub is_personalized: bool,
}

impl ChatMessage {
    /// Builds a plain message with no streaming metadata.
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp,
            tokens_per_sec: None,
            sources: Vec::new(),
            is_personalized: false,
        }
    }
}

/// A persisted chat session. Messages are stored separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    /// Catalog id of the model active when the session was created.
    pub model_id: String,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
    /// Unix timestamp in milliseconds.
    pub last_modified: i64,
}

// --- Pipeline progress types ---

/// Progress of one reasoning step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Active,
    Complete,
}

/// A UI-facing label/status pair for one stage of the response pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub label: String,
    pub status: StepStatus,
}

impl ReasoningStep {
    /// A step that has not started yet.
    pub fn pending(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: StepStatus::Pending,
        }
    }
}

// --- Cognitive memory types ---

/// Category assigned to a learned memory entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemoryKind {
    Preference,
    Style,
    Knowledge,
    Task,
}

/// A learned snippet of user preference, style or knowledge.
///
/// Entries are immutable once created; the vault only ever appends and evicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Time-ordered unique id; lexical order equals creation order.
    pub id: String,
    pub text: String,
    pub kind: MemoryKind,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Ranking weight in `0.0..=1.0`.
    pub importance: f64,
}

// --- Provider types ---

/// Role of a turn as understood by the generation API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One conversation turn sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTurn {
    pub role: TurnRole,
    pub content: String,
}

/// A streaming generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Remote model identifier.
    pub model: String,
    pub turns: Vec<GenerationTurn>,
    pub system_instruction: String,
    pub temperature: f32,
    /// Reasoning token budget the remote model may spend before answering.
    pub thinking_budget: u32,
}

/// A single chunk from a streaming provider response.
///
/// Chunks without text (usage-only or thought-only payloads) are legal and
/// carry no fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderStreamChunk {
    pub text: Option<String>,
    pub finish_reason: Option<String>,
}

impl ProviderStreamChunk {
    /// A chunk carrying a text fragment.
    pub fn text(fragment: impl Into<String>) -> Self {
        Self {
            text: Some(fragment.into()),
            finish_reason: None,
        }
    }
}
