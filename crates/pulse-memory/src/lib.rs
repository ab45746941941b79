// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cognitive memory for the Pulse assistant.
//!
//! A small heuristic memory of user preferences learned from past
//! interactions and injected into later prompts.
//!
//! ## Architecture
//!
//! - **MemoryStore**: capped (30), insertion-ordered entry list
//! - **classifier**: kind and importance of a finished interaction
//! - **retriever**: keyword overlap ranked by importance
//! - **CognitiveMemory**: recall and learn over an explicit `MemoryVault`

pub mod classifier;
pub mod learner;
pub mod retriever;
pub mod store;

pub use learner::{should_learn, CognitiveMemory, Recall, IDENTITY_VAULT_SOURCE};
pub use store::{MemoryStore, MEMORY_CAPACITY};
