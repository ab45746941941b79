// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express:
//! catalog membership of model ids, non-empty paths, known log levels.

use crate::catalog;
use crate::diagnostic::ConfigError;
use crate::model::PulseConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &PulseConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (key, id) in [
        ("assistant.active_model_id", &config.assistant.active_model_id),
        ("assistant.reasoning_model_id", &config.assistant.reasoning_model_id),
    ] {
        if catalog::find_model(id).is_none() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "{key} `{id}` is not a known model (available: {})",
                    catalog::model_ids().join(", ")
                ),
            });
        }
    }

    let level = config.assistant.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "assistant.log_level `{}` must be one of {}",
                config.assistant.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.gemini.model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.model must not be empty".to_string(),
        });
    }

    if !config.gemini.base_url.starts_with("http://")
        && !config.gemini.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "gemini.base_url `{}` must start with http:// or https://",
                config.gemini.base_url
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
