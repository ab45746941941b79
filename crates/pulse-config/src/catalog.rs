// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog of the "local" models the assistant advertises.
//!
//! Nothing here is ever loaded; the entries only drive labels and the
//! engine name written into the system instruction.

use serde::Serialize;
use strum::Display;

/// What a catalog model is presented as doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum ModelRole {
    Generalist,
    Reasoning,
    Embedding,
}

/// One advertised model.
#[derive(Debug, Clone, Serialize)]
pub struct LocalModel {
    pub id: &'static str,
    pub name: &'static str,
    /// Short name used in step labels, e.g. "Phi-3".
    pub short_name: &'static str,
    pub version: &'static str,
    pub size: &'static str,
    pub vram_required: &'static str,
    pub is_downloaded: bool,
    pub role: ModelRole,
    pub description: &'static str,
}

/// Every model the assistant knows about.
pub const AVAILABLE_MODELS: &[LocalModel] = &[
    LocalModel {
        id: "qwen-2.5-coder-7b",
        name: "Qwen 2.5 Coder 7B",
        short_name: "Qwen 7B",
        version: "Q4_K_M",
        size: "4.7 GB",
        vram_required: "5.2 GB",
        is_downloaded: true,
        role: ModelRole::Generalist,
        description: "Premier coding workhorse. Optimized for mobile ARM64.",
    },
    LocalModel {
        id: "phi-3-mini-reasoner",
        name: "Phi-3 Mini",
        short_name: "Phi-3",
        version: "3.8B Q4",
        size: "2.2 GB",
        vram_required: "2.8 GB",
        is_downloaded: true,
        role: ModelRole::Reasoning,
        description: "Planning model. Low RAM footprint for intent detection.",
    },
];

/// Looks up a catalog model by id.
pub fn find_model(id: &str) -> Option<&'static LocalModel> {
    AVAILABLE_MODELS.iter().find(|m| m.id == id)
}

/// Returns the ids of every catalog model, for error messages.
pub fn model_ids() -> Vec<&'static str> {
    AVAILABLE_MODELS.iter().map(|m| m.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_models_are_in_catalog() {
        let generalist = find_model("qwen-2.5-coder-7b").unwrap();
        assert_eq!(generalist.role, ModelRole::Generalist);
        assert_eq!(generalist.name, "Qwen 2.5 Coder 7B");

        let reasoner = find_model("phi-3-mini-reasoner").unwrap();
        assert_eq!(reasoner.role, ModelRole::Reasoning);
        assert_eq!(reasoner.short_name, "Phi-3");
    }

    #[test]
    fn unknown_model_is_none() {
        assert!(find_model("llama-70b").is_none());
    }

    #[test]
    fn ids_are_unique() {
        let ids = model_ids();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(ids.len(), deduped.len());
    }
}
