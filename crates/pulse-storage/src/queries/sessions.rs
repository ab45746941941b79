// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session CRUD operations.

use pulse_core::types::ChatSession;
use pulse_core::PulseError;
use rusqlite::{params, OptionalExtension, Row};

use crate::database::{map_tr_err, Database};

const SESSION_COLUMNS: &str = "id, title, model_id, created_at, last_modified";

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<ChatSession> {
    Ok(ChatSession {
        id: row.get(0)?,
        title: row.get(1)?,
        model_id: row.get(2)?,
        created_at: row.get(3)?,
        last_modified: row.get(4)?,
    })
}

/// Create a new session.
pub async fn create_session(db: &Database, session: &ChatSession) -> Result<(), PulseError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, title, model_id, created_at, last_modified)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    session.id,
                    session.title,
                    session.model_id,
                    session.created_at,
                    session.last_modified,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a session by ID.
pub async fn get_session(db: &Database, id: &str) -> Result<Option<ChatSession>, PulseError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"),
                params![id],
                row_to_session,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// List all sessions, most recently created first.
pub async fn list_sessions(db: &Database) -> Result<Vec<ChatSession>, PulseError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map([], row_to_session)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Change a session's title.
pub async fn rename_session(db: &Database, id: &str, title: &str) -> Result<(), PulseError> {
    let id = id.to_string();
    let title = title.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE sessions SET title = ?1 WHERE id = ?2",
                params![title, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a session and all of its messages.
pub async fn delete_session(db: &Database, id: &str) -> Result<(), PulseError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM messages WHERE session_id = ?1", params![id])?;
            tx.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    fn make_session(id: &str, created_at: i64) -> ChatSession {
        ChatSession {
            id: id.to_string(),
            title: "Neural Core Alpha".to_string(),
            model_id: "qwen-2.5-coder-7b".to_string(),
            created_at,
            last_modified: created_at,
        }
    }

    #[tokio::test]
    async fn create_and_get_session() {
        let (db, _dir) = setup_db().await;
        let session = make_session("sess-1", 1_000);

        create_session(&db, &session).await.unwrap();
        let retrieved = get_session(&db, "sess-1").await.unwrap();
        assert_eq!(retrieved, Some(session));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_session_returns_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_session(&db, "nope").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (db, _dir) = setup_db().await;
        create_session(&db, &make_session("old", 1_000)).await.unwrap();
        create_session(&db, &make_session("new", 2_000)).await.unwrap();

        let ids: Vec<_> = list_sessions(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn rename_updates_title() {
        let (db, _dir) = setup_db().await;
        create_session(&db, &make_session("s", 1_000)).await.unwrap();
        rename_session(&db, "s", "Explain RAG").await.unwrap();

        let session = get_session(&db, "s").await.unwrap().unwrap();
        assert_eq!(session.title, "Explain RAG");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let (db, _dir) = setup_db().await;
        create_session(&db, &make_session("s", 1_000)).await.unwrap();
        delete_session(&db, "s").await.unwrap();
        assert!(get_session(&db, "s").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
