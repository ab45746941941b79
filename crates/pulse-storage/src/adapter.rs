// SPDX-FileCopyrightText: 2026 Pulse Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter and MemoryVault traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use pulse_config::model::StorageConfig;
use pulse_core::types::{ChatMessage, ChatSession, MemoryEntry};
use pulse_core::{AdapterType, HealthStatus, MemoryVault, PluginAdapter, PulseError, StorageAdapter};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened on the first call to
/// [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, PulseError> {
        self.db.get().ok_or_else(|| PulseError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), PulseError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, PulseError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PulseError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), PulseError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| PulseError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PulseError> {
        Self::checkpoint(self.db()?).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Session operations ---

    async fn create_session(&self, session: &ChatSession) -> Result<(), PulseError> {
        queries::sessions::create_session(self.db()?, session).await
    }

    async fn get_session(&self, id: &str) -> Result<Option<ChatSession>, PulseError> {
        queries::sessions::get_session(self.db()?, id).await
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, PulseError> {
        queries::sessions::list_sessions(self.db()?).await
    }

    async fn rename_session(&self, id: &str, title: &str) -> Result<(), PulseError> {
        queries::sessions::rename_session(self.db()?, id, title).await
    }

    async fn delete_session(&self, id: &str) -> Result<(), PulseError> {
        queries::sessions::delete_session(self.db()?, id).await
    }

    // --- Message operations ---

    async fn insert_message(
        &self,
        session_id: &str,
        message: &ChatMessage,
    ) -> Result<(), PulseError> {
        queries::messages::insert_message(self.db()?, session_id, message).await
    }

    async fn get_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>, PulseError> {
        queries::messages::get_messages_for_session(self.db()?, session_id).await
    }
}

#[async_trait]
impl MemoryVault for SqliteStorage {
    async fn load(&self) -> Result<Vec<MemoryEntry>, PulseError> {
        queries::memories::load_memories(self.db()?).await
    }

    async fn save(&self, entries: &[MemoryEntry]) -> Result<(), PulseError> {
        queries::memories::replace_memories(self.db()?, entries).await?;
        debug!(entries = entries.len(), "memory vault saved");
        Ok(())
    }
}
