// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session bookkeeping on top of a [`StorageAdapter`].
//!
//! A new session starts with a placeholder title which the first user
//! message replaces with its leading characters.

use std::sync::Arc;

use pulse_core::error::PulseError;
use pulse_core::traits::StorageAdapter;
use pulse_core::types::{ChatMessage, ChatSession, Role};
use tracing::{debug, info};

/// Title given to freshly created sessions.
pub const DEFAULT_SESSION_TITLE: &str = "Neural Core Alpha";

/// Characters of the first user message kept as the session title.
pub const TITLE_CHARS: usize = 24;

/// Creates, lists and appends to persisted chat sessions.
#[derive(Clone)]
pub struct ChatSessionManager {
    storage: Arc<dyn StorageAdapter>,
}

impl ChatSessionManager {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Creates and persists an empty session bound to `model_id`.
    pub async fn create(&self, model_id: &str) -> Result<ChatSession, PulseError> {
        let now = now_millis();
        let session = ChatSession {
            id: uuid::Uuid::now_v7().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            model_id: model_id.to_string(),
            created_at: now,
            last_modified: now,
        };
        self.storage.create_session(&session).await?;
        info!(session_id = %session.id, model_id, "session created");
        Ok(session)
    }

    /// All sessions, newest first.
    pub async fn list(&self) -> Result<Vec<ChatSession>, PulseError> {
        self.storage.list_sessions().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ChatSession>, PulseError> {
        self.storage.get_session(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), PulseError> {
        self.require(id).await?;
        self.storage.delete_session(id).await?;
        info!(session_id = id, "session deleted");
        Ok(())
    }

    /// Messages of a session in chronological order.
    pub async fn messages(&self, id: &str) -> Result<Vec<ChatMessage>, PulseError> {
        self.storage.get_messages(id).await
    }

    /// Appends a user message. The first message of a session also becomes
    /// its title.
    pub async fn record_user_message(
        &self,
        session_id: &str,
        content: &str,
    ) -> Result<ChatMessage, PulseError> {
        self.require(session_id).await?;
        let is_first = self.storage.get_messages(session_id).await?.is_empty();

        let message = ChatMessage::new(new_message_id(), Role::User, content, now_millis());
        self.storage.insert_message(session_id, &message).await?;

        if is_first {
            let title = session_title(content);
            self.storage.rename_session(session_id, &title).await?;
            debug!(session_id, %title, "session titled from first message");
        }
        Ok(message)
    }

    /// Appends a completed assistant reply. Replies with context sources are
    /// marked personalized.
    pub async fn record_assistant_message(
        &self,
        session_id: &str,
        content: &str,
        sources: Vec<String>,
        tokens_per_sec: Option<u32>,
    ) -> Result<ChatMessage, PulseError> {
        let message = ChatMessage {
            is_personalized: !sources.is_empty(),
            tokens_per_sec,
            sources,
            ..ChatMessage::new(new_message_id(), Role::Assistant, content, now_millis())
        };
        self.storage.insert_message(session_id, &message).await?;
        Ok(message)
    }

    async fn require(&self, id: &str) -> Result<ChatSession, PulseError> {
        self.storage
            .get_session(id)
            .await?
            .ok_or_else(|| PulseError::Storage {
                source: format!("session not found: {id}").into(),
            })
    }
}

/// The first [`TITLE_CHARS`] characters of `content`.
pub fn session_title(content: &str) -> String {
    content.chars().take(TITLE_CHARS).collect()
}

fn new_message_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
