// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Pulse assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Pulse configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PulseConfig {
    /// Assistant identity, model selection and behavior toggles.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Remote Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Simulated stage timings of the response pipeline.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Performance tier ("governor") controlling generation temperature and budget.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Deserialize, Serialize,
)]
pub enum PerformanceProfile {
    Eco,
    #[default]
    Balanced,
    Performance,
}

/// Advertised weight quantization of the "local" model. Cosmetic only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Deserialize, Serialize,
)]
pub enum Quantization {
    #[default]
    #[serde(rename = "4-bit")]
    #[strum(serialize = "4-bit")]
    FourBit,
    #[serde(rename = "6-bit")]
    #[strum(serialize = "6-bit")]
    SixBit,
    #[serde(rename = "8-bit")]
    #[strum(serialize = "8-bit")]
    EightBit,
}

/// Assistant identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Display name of the assistant.
    #[serde(default = "default_assistant_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Catalog id of the generalist model shown as the generation engine.
    #[serde(default = "default_active_model_id")]
    pub active_model_id: String,

    /// Catalog id of the planning model shown for intent decomposition.
    #[serde(default = "default_reasoning_model_id")]
    pub reasoning_model_id: String,

    /// Shown in the chat banner; generation always goes to the remote model.
    #[serde(default)]
    pub quantization: Quantization,

    #[serde(default)]
    pub profile: PerformanceProfile,

    /// Inject learned preferences into prompts.
    #[serde(default = "default_true")]
    pub use_cognitive_memory: bool,

    /// Display-only, like `quantization`.
    #[serde(default = "default_true")]
    pub use_gpu: bool,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            log_level: default_log_level(),
            active_model_id: default_active_model_id(),
            reasoning_model_id: default_reasoning_model_id(),
            quantization: Quantization::default(),
            profile: PerformanceProfile::default(),
            use_cognitive_memory: true,
            use_gpu: true,
        }
    }
}

fn default_assistant_name() -> String {
    "pulse".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_active_model_id() -> String {
    "qwen-2.5-coder-7b".to_string()
}

fn default_reasoning_model_id() -> String {
    "phi-3-mini-reasoner".to_string()
}

fn default_true() -> bool {
    true
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to `GEMINI_API_KEY`, then `API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Remote model every request is actually sent to.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API root, overridable for proxies and tests.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("pulse").join("pulse.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("pulse.db"))
        .to_string_lossy()
        .into_owned()
}

/// Timings of the simulated pipeline stages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Hold time of the intent stage, in milliseconds.
    #[serde(default = "default_intent_delay_ms")]
    pub intent_delay_ms: u64,

    /// Hold time of the memory sync stage, in milliseconds.
    #[serde(default = "default_memory_sync_delay_ms")]
    pub memory_sync_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            intent_delay_ms: default_intent_delay_ms(),
            memory_sync_delay_ms: default_memory_sync_delay_ms(),
        }
    }
}

fn default_intent_delay_ms() -> u64 {
    700
}

fn default_memory_sync_delay_ms() -> u64 {
    300
}
