// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the generation stage.

use pulse_config::{PerformanceProfile, find_model};
use pulse_core::types::{ChatMessage, GenerationTurn, Role, TurnRole};

/// Personal context used when memory contributed nothing.
pub const GENERIC_PROFILE: &str = "Generic profile.";

/// Sampling settings derived from the performance profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub thinking_budget: u32,
}

impl GenerationSettings {
    pub fn for_profile(profile: PerformanceProfile) -> Self {
        let temperature = match profile {
            PerformanceProfile::Eco => 0.2,
            PerformanceProfile::Balanced | PerformanceProfile::Performance => 0.75,
        };
        let thinking_budget = match profile {
            PerformanceProfile::Performance => 32_000,
            PerformanceProfile::Eco | PerformanceProfile::Balanced => 12_000,
        };
        Self {
            temperature,
            thinking_budget,
        }
    }
}

/// Display name of the generation engine for a catalog model id.
pub fn engine_name(model_id: &str) -> &str {
    find_model(model_id).map_or(model_id, |m| m.name)
}

/// Builds the system instruction around the recalled personal context.
pub fn system_instruction(engine_name: &str, personal_context: &str) -> String {
    let context = if personal_context.is_empty() {
        GENERIC_PROFILE
    } else {
        personal_context
    };
    format!(
        "SYSTEM: NeuralPulse V3 (Engine: {engine_name}).\n\
         ENVIRONMENT: 100% Offline, Private, ARM64 Optimized.\n\
         PERSONAL_CONTEXT: {context}\n\
         \n\
         FORMATTING RULES:\n\
         - Use clean Markdown.\n\
         - Always separate paragraphs with double line breaks.\n\
         - High-contrast code blocks with language identifiers.\n\
         - Bulleted lists for reasoning.\n\
         - Ensure lists have space between items.\n"
    )
}

/// Maps chat history onto provider turns. Only assistant messages become
/// model turns; system messages are sent as user turns.
pub fn to_generation_turns(history: &[ChatMessage]) -> Vec<GenerationTurn> {
    history
        .iter()
        .map(|m| GenerationTurn {
            role: match m.role {
                Role::Assistant => TurnRole::Model,
                Role::User | Role::System => TurnRole::User,
            },
            content: m.content.clone(),
        })
        .collect()
}
