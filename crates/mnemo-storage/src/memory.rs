// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the SessionStore trait.
//!
//! Selected explicitly via `storage.backend = "memory"`. Nothing survives
//! process exit. Used by tests and throwaway shells; it is never a silent
//! fallback for a failed SQLite open.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use mnemo_core::{
    now_iso8601, AdapterType, ChatMessage, ConversationSession, HealthStatus, LearningSession,
    LearningSessionSummary, MnemoError, PluginAdapter, Role, SessionStore, User,
};

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    // Insertion-ordered; the current session of a user is the last one.
    sessions: Vec<ConversationSession>,
    messages: Vec<ChatMessage>,
    learning: Vec<LearningSession>,
}

impl Inner {
    fn current_session_id(&self, user_id: &str) -> Option<String> {
        self.sessions
            .iter()
            .rev()
            .find(|s| s.user_id == user_id)
            .map(|s| s.id.clone())
    }

    fn resolve_or_create_session(&mut self, user_id: &str) -> String {
        if let Some(id) = self.current_session_id(user_id) {
            return id;
        }
        let now = now_iso8601();
        let session = ConversationSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        let id = session.id.clone();
        self.sessions.push(session);
        id
    }
}

/// In-memory session store backed by mutex-guarded maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn initialize(&self) -> Result<(), MnemoError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), MnemoError> {
        Ok(())
    }

    async fn get_or_create_user(&self, user_id: &str) -> Result<User, MnemoError> {
        let mut inner = self.inner.lock().await;
        let user = inner
            .users
            .entry(user_id.to_string())
            .or_insert_with(|| User {
                id: user_id.to_string(),
                settings: "{}".to_string(),
                created_at: now_iso8601(),
            });
        Ok(user.clone())
    }

    async fn get_preferences(&self, user_id: &str) -> Result<serde_json::Value, MnemoError> {
        let user = self.get_or_create_user(user_id).await?;
        serde_json::from_str(&user.settings).map_err(|e| MnemoError::Storage {
            source: Box::new(e),
        })
    }

    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: serde_json::Value,
    ) -> Result<(), MnemoError> {
        let mut current = self.get_preferences(user_id).await?;
        match (&mut current, preferences) {
            (serde_json::Value::Object(existing), serde_json::Value::Object(incoming)) => {
                for (k, v) in incoming {
                    existing.insert(k, v);
                }
            }
            (current, incoming) => *current = incoming,
        }
        let mut inner = self.inner.lock().await;
        if let Some(user) = inner.users.get_mut(user_id) {
            user.settings = current.to_string();
        }
        Ok(())
    }

    async fn get_conversation_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MnemoError> {
        let inner = self.inner.lock().await;
        let Some(session_id) = inner.current_session_id(user_id) else {
            return Ok(Vec::new());
        };
        let matching: Vec<&ChatMessage> = inner
            .messages
            .iter()
            .filter(|m| m.session_id == session_id)
            .collect();
        let start = matching.len().saturating_sub(limit);
        Ok(matching[start..].iter().map(|m| (*m).clone()).collect())
    }

    async fn add_message_to_history(
        &self,
        user_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), MnemoError> {
        let mut inner = self.inner.lock().await;
        let session_id = inner.resolve_or_create_session(user_id);
        let now = now_iso8601();
        inner.messages.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.clone(),
            role,
            content: content.to_string(),
            created_at: now.clone(),
        });
        if let Some(session) = inner.sessions.iter_mut().find(|s| s.id == session_id) {
            session.updated_at = now;
        }
        Ok(())
    }

    async fn clear_conversation_history(&self, user_id: &str) -> Result<(), MnemoError> {
        let mut inner = self.inner.lock().await;
        if let Some(session_id) = inner.current_session_id(user_id) {
            inner.messages.retain(|m| m.session_id != session_id);
        }
        Ok(())
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
        let id = session.id.clone();
        self.inner.lock().await.learning.push(session);
        Ok(id)
    }

    async fn get_learning_session(
        &self,
        session_id: &str,
    ) -> Result<Option<LearningSession>, MnemoError> {
        let inner = self.inner.lock().await;
        Ok(inner.learning.iter().find(|s| s.id == session_id).cloned())
    }

    async fn get_learning_session_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<LearningSession>, MnemoError> {
        let inner = self.inner.lock().await;
        // Insertion order matches creation order, so the first match is
        // the earliest created.
        Ok(inner
            .learning
            .iter()
            .find(|s| s.user_id == user_id && s.name == name)
            .cloned())
    }

    async fn list_learning_sessions(
        &self,
        user_id: &str,
    ) -> Result<Vec<LearningSessionSummary>, MnemoError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .learning
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .map(|s| LearningSessionSummary {
                id: s.id.clone(),
                name: s.name.clone(),
                description: s.description.clone().unwrap_or_default(),
                created_at: s.created_at.clone(),
            })
            .collect())
    }

    async fn update_learning_session(
        &self,
        session_id: &str,
        content: &str,
        description: Option<&str>,
    ) -> Result<(), MnemoError> {
        let mut inner = self.inner.lock().await;
        if let Some(session) = inner.learning.iter_mut().find(|s| s.id == session_id) {
            session.content = content.to_string();
            if let Some(desc) = description {
                session.description = Some(desc.to_string());
            }
            session.updated_at = now_iso8601();
        }
        Ok(())
    }

    async fn delete_learning_session(&self, session_id: &str) -> Result<(), MnemoError> {
        let mut inner = self.inner.lock().await;
        inner.learning.retain(|s| s.id != session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn behaves_like_sqlite_for_history() {
        let store = MemoryStore::new();
        store.get_or_create_user("u1").await.unwrap();

        store
            .add_message_to_history("u1", Role::User, "one")
            .await
            .unwrap();
        store
            .add_message_to_history("u1", Role::Assistant, "two")
            .await
            .unwrap();
        store
            .add_message_to_history("u1", Role::User, "three")
            .await
            .unwrap();

        let history = store.get_conversation_history("u1", 2).await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn clear_keeps_session_row() {
        let store = MemoryStore::new();
        store
            .add_message_to_history("u1", Role::User, "hello")
            .await
            .unwrap();

        store.clear_conversation_history("u1").await.unwrap();
        assert!(store
            .get_conversation_history("u1", 10)
            .await
            .unwrap()
            .is_empty());

        assert_eq!(store.inner.lock().await.sessions.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_names_resolve_to_earliest() {
        let store = MemoryStore::new();
        let first = store
            .create_learning_session("u1", "topic", "a", None, None)
            .await
            .unwrap();
        store
            .create_learning_session("u1", "topic", "b", None, None)
            .await
            .unwrap();

        let found = store
            .get_learning_session_by_name("u1", "topic")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = MemoryStore::new();
        store
            .create_learning_session("u1", "first", "a", None, None)
            .await
            .unwrap();
        store
            .create_learning_session("u1", "second", "b", None, None)
            .await
            .unwrap();

        let list = store.list_learning_sessions("u1").await.unwrap();
        assert_eq!(list[0].name, "second");
        assert_eq!(list[1].name, "first");
        // A record without a description lists as an empty summary.
        assert_eq!(list[0].description, "");
    }
}
