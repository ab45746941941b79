// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message persistence.
//!
//! `sources` is stored as a JSON array. Reads return messages in insertion
//! order.

use std::str::FromStr;

use pulse_core::types::{ChatMessage, Role};
use pulse_core::PulseError;
use rusqlite::types::Type;
use rusqlite::{params, Row};

use crate::database::{map_tr_err, Database};

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    let role: String = row.get(1)?;
    let role = Role::from_str(&role)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let sources: String = row.get(5)?;
    let sources = serde_json::from_str(&sources)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(ChatMessage {
        id: row.get(0)?,
        role,
        content: row.get(2)?,
        timestamp: row.get(3)?,
        tokens_per_sec: row.get(4)?,
        sources,
        is_personalized: row.get(6)?,
    })
}

/// Insert a message and bump the owning session's `last_modified`.
pub async fn insert_message(
    db: &Database,
    session_id: &str,
    msg: &ChatMessage,
) -> Result<(), PulseError> {
    let session_id = session_id.to_string();
    let sources = serde_json::to_string(&msg.sources).map_err(PulseError::storage)?;
    let msg = msg.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO messages (id, session_id, role, content, timestamp, tokens_per_sec, sources, is_personalized)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    msg.id,
                    session_id,
                    msg.role.to_string(),
                    msg.content,
                    msg.timestamp,
                    msg.tokens_per_sec,
                    sources,
                    msg.is_personalized,
                ],
            )?;
            tx.execute(
                "UPDATE sessions SET last_modified = MAX(last_modified, ?1) WHERE id = ?2",
                params![msg.timestamp, session_id],
            )?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Get every message of a session in insertion order.
pub async fn get_messages_for_session(
    db: &Database,
    session_id: &str,
) -> Result<Vec<ChatMessage>, PulseError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, role, content, timestamp, tokens_per_sec, sources, is_personalized
                 FROM messages WHERE session_id = ?1 ORDER BY seq ASC",
            )?;
            let rows = stmt.query_map(params![session_id], row_to_message)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
