// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword retriever ranking stored entries by term overlap and importance.
//!
//! A query is split on whitespace into lowercased terms; terms of three
//! characters or fewer are discarded as noise. An entry matches when its
//! lowercased text contains any remaining term. Matches are ordered by
//! importance (highest first, insertion order on ties) and the best
//! [`MAX_RESULTS`] texts are returned.

use crate::store::MemoryStore;

/// Maximum number of entry texts returned per query.
pub const MAX_RESULTS: usize = 2;

/// Terms must be strictly longer than this many characters.
const MIN_TERM_CHARS: usize = 3;

/// Returns the texts of the most relevant entries for `query`.
pub fn retrieve(store: &MemoryStore, query: &str) -> Vec<String> {
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<_> = store
        .iter()
        .filter(|entry| {
            let text = entry.text.to_lowercase();
            terms.iter().any(|term| text.contains(term.as_str()))
        })
        .collect();

    // `sort_by` is stable, so equal importance keeps insertion order.
    matches.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    matches
        .into_iter()
        .take(MAX_RESULTS)
        .map(|entry| entry.text.clone())
        .collect()
}

fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|term| term.chars().count() > MIN_TERM_CHARS)
        .map(str::to_owned)
        .collect()
}
