// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory vault table. The vault is always replaced wholesale.

use std::str::FromStr;

use pulse_core::types::{MemoryEntry, MemoryKind};
use pulse_core::PulseError;
use rusqlite::types::Type;
use rusqlite::{params, Row};

use crate::database::{map_tr_err, Database};

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<MemoryEntry> {
    let kind: String = row.get(2)?;
    let kind = MemoryKind::from_str(&kind)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(MemoryEntry {
        id: row.get(0)?,
        text: row.get(1)?,
        kind,
        timestamp: row.get(3)?,
        importance: row.get(4)?,
    })
}

/// Every stored entry in insertion order.
pub async fn load_memories(db: &Database) -> Result<Vec<MemoryEntry>, PulseError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, kind, timestamp, importance FROM memories ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map([], row_to_entry)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Replaces the whole vault with `entries`, preserving their order.
pub async fn replace_memories(db: &Database, entries: &[MemoryEntry]) -> Result<(), PulseError> {
    let entries = entries.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM memories", [])?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO memories (id, text, kind, timestamp, importance)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for entry in &entries {
                    stmt.execute(params![
                        entry.id,
                        entry.text,
                        entry.kind.to_string(),
                        entry.timestamp,
                        entry.importance,
                    ])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}
