// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the SessionStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;
use uuid::Uuid;

use mnemo_config::model::StorageConfig;
use mnemo_core::{
    now_iso8601, AdapterType, ChatMessage, HealthStatus, LearningSession,
    LearningSessionSummary, MnemoError, PluginAdapter, Role, SessionStore, User,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed session store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`SessionStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, MnemoError> {
        self.db.get().ok_or_else(|| MnemoError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn initialize(&self) -> Result<(), MnemoError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| MnemoError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite session store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), MnemoError> {
        self.db()?.close().await
    }

    async fn get_or_create_user(&self, user_id: &str) -> Result<User, MnemoError> {
        queries::users::get_or_create_user(self.db()?, user_id).await
    }

    async fn get_preferences(&self, user_id: &str) -> Result<serde_json::Value, MnemoError> {
        let raw = queries::users::get_settings(self.db()?, user_id).await?;
        serde_json::from_str(&raw).map_err(|e| MnemoError::Storage {
            source: Box::new(e),
        })
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: serde_json::Value,
    ) -> Result<(), MnemoError> {
        let mut current = self.get_preferences(user_id).await?;
        // Shallow merge: incoming top-level keys overwrite existing ones.
        match (&mut current, preferences) {
            (serde_json::Value::Object(existing), serde_json::Value::Object(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k, v);
                }
            }
            (current, incoming) => *current = incoming,
        }
        queries::users::update_settings(self.db()?, user_id, current.to_string()).await
    }

    async fn get_conversation_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MnemoError> {
        queries::conversations::recent_messages(self.db()?, user_id, limit).await
    }

    async fn add_message_to_history(
        &self,
        user_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), MnemoError> {
        queries::conversations::append_message(self.db()?, user_id, role, content).await
    }

    async fn clear_conversation_history(&self, user_id: &str) -> Result<(), MnemoError> {
        queries::conversations::clear_history(self.db()?, user_id).await
    }

    async fn create_learning_session(
        &self,
        user_id: &str,
        name: &str,
        content: &str,
        description: Option<&str>,
        source: Option<&str>,
    ) -> Result<String, MnemoError> {
        let now = now_iso8601();
        let session = LearningSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            content: content.to_string(),
            source: source.map(|s| s.to_string()),
            created_at: now.clone(),
            updated_at: now,
        };
        queries::learning::create(self.db()?, &session).await?;
        Ok(session.id)
    }

    async fn get_learning_session(
        &self,
        session_id: &str,
    ) -> Result<Option<LearningSession>, MnemoError> {
        queries::learning::get_by_id(self.db()?, session_id).await
    }

    async fn get_learning_session_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<LearningSession>, MnemoError> {
        queries::learning::get_by_name(self.db()?, user_id, name).await
    }

    async fn list_learning_sessions(
        &self,
        user_id: &str,
    ) -> Result<Vec<LearningSessionSummary>, MnemoError> {
        queries::learning::list_for_user(self.db()?, user_id).await
    }

    async fn update_learning_session(
        &self,
        session_id: &str,
        content: &str,
        description: Option<&str>,
    ) -> Result<(), MnemoError> {
        queries::learning::update(self.db()?, session_id, content, description).await
    }

    async fn delete_learning_session(&self, session_id: &str) -> Result<(), MnemoError> {
        queries::learning::delete(self.db()?, session_id).await
    }
}
