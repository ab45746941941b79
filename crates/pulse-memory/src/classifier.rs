// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based classification of a finished interaction into a memory entry.

use pulse_core::types::{MemoryEntry, MemoryKind};
use uuid::Uuid;

/// Characters of the query kept in an entry's summary.
pub const QUERY_SUMMARY_CHARS: usize = 100;

/// Characters of the response kept in an entry's summary.
pub const RESPONSE_SUMMARY_CHARS: usize = 200;

/// Markers in a lowercased query that signal a stated preference.
const PREFERENCE_MARKERS: [&str; 2] = ["i prefer", "use "];

/// Decides what kind of memory an interaction produces. First match wins:
/// a fenced code block in the response means `Style`, a preference marker
/// in the query means `Preference`, anything else is `Knowledge`.
pub fn classify(query: &str, response: &str) -> MemoryKind {
    if response.contains("```") {
        return MemoryKind::Style;
    }
    let query = query.to_lowercase();
    if PREFERENCE_MARKERS.iter().any(|m| query.contains(m)) {
        MemoryKind::Preference
    } else {
        MemoryKind::Knowledge
    }
}

pub fn importance(kind: MemoryKind) -> f64 {
    match kind {
        MemoryKind::Preference => 1.0,
        _ => 0.6,
    }
}

/// Fixed-format summary stored as the entry text.
pub fn summarize(query: &str, response: &str) -> String {
    format!(
        "Context: {}... -> Learned: {}...",
        truncate_chars(query, QUERY_SUMMARY_CHARS),
        truncate_chars(response, RESPONSE_SUMMARY_CHARS)
    )
}

/// Builds a new entry stamped with a time-ordered id and the current time.
pub fn new_entry(query: &str, response: &str) -> MemoryEntry {
    let kind = classify(query, response);
    MemoryEntry {
        id: Uuid::now_v7().to_string(),
        text: summarize(query, response),
        kind,
        timestamp: chrono::Utc::now().timestamp_millis(),
        importance: importance(kind),
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
