// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for chat session persistence.

use async_trait::async_trait;

use crate::error::PulseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatMessage, ChatSession};

/// Adapter for session and message persistence.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), PulseError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), PulseError>;

    // --- Session operations ---

    /// Creates a new session.
    async fn create_session(&self, session: &ChatSession) -> Result<(), PulseError>;

    /// Gets a session by ID.
    async fn get_session(&self, id: &str) -> Result<Option<ChatSession>, PulseError>;

    /// Lists all sessions, most recently created first.
    async fn list_sessions(&self) -> Result<Vec<ChatSession>, PulseError>;

    /// Renames a session and bumps its `last_modified`.
    async fn rename_session(&self, id: &str, title: &str) -> Result<(), PulseError>;

    /// Deletes a session together with its messages.
    async fn delete_session(&self, id: &str) -> Result<(), PulseError>;

    // --- Message operations ---

    /// Appends a message to a session and bumps the session's `last_modified`.
    async fn insert_message(&self, session_id: &str, message: &ChatMessage)
        -> Result<(), PulseError>;

    /// Gets a session's messages in chronological order.
    async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, PulseError>;
}
