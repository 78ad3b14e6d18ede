// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store trait for persistence backends.
//!
//! Two implementations exist: a SQLite backend and an in-memory test
//! double. The backend is selected once at startup by configuration,
//! never by runtime failure of a connection probe.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ChatMessage, LearningSession, LearningSessionSummary, Role, User,
};

/// Adapter for the relational session store.
///
/// Holds user records, rolling conversation history, and named learning
/// sessions. Conversation reads are capped by the caller-supplied limit;
/// total stored history is unbounded.
#[async_trait]
pub trait SessionStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), MnemoError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), MnemoError>;

    // --- Users ---

    /// Fetches a user record, creating it lazily on first reference.
    async fn get_or_create_user(&self, user_id: &str) -> Result<User, MnemoError>;

    /// Returns the user's preferences as a JSON object.
    async fn get_preferences(&self, user_id: &str) -> Result<serde_json::Value, MnemoError>;

    /// Merges the given preferences into the user's existing ones
    /// (incoming keys overwrite).
    async fn update_preferences(
        &self,
        user_id: &str,
        preferences: serde_json::Value,
    ) -> Result<(), MnemoError>;

    // --- Conversation history ---

    /// Returns the `limit` most recent messages of the user's current
    /// conversation session, in chronological order.
    async fn get_conversation_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, MnemoError>;

    /// Appends a message to the user's current conversation session,
    /// creating the session if none exists.
    async fn add_message_to_history(
        &self,
        user_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), MnemoError>;

    /// Deletes all messages of the user's current conversation session.
    /// The session record itself persists.
    async fn clear_conversation_history(&self, user_id: &str) -> Result<(), MnemoError>;

    // --- Learning sessions ---

    /// Creates a learning session record and returns its id.
    async fn create_learning_session(
        &self,
        user_id: &str,
        name: &str,
        content: &str,
        description: Option<&str>,
        source: Option<&str>,
    ) -> Result<String, MnemoError>;

    /// Fetches a learning session by id.
    async fn get_learning_session(
        &self,
        session_id: &str,
    ) -> Result<Option<LearningSession>, MnemoError>;

    /// Fetches a learning session by `(user_id, name)`. Duplicate names
    /// are permitted; the earliest-created match is returned.
    async fn get_learning_session_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<LearningSession>, MnemoError>;

    /// Lists learning-session metadata for a user, newest first.
    async fn list_learning_sessions(
        &self,
        user_id: &str,
    ) -> Result<Vec<LearningSessionSummary>, MnemoError>;

    /// Replaces a learning session's content (and optionally description),
    /// bumping its updated_at timestamp.
    async fn update_learning_session(
        &self,
        session_id: &str,
        content: &str,
        description: Option<&str>,
    ) -> Result<(), MnemoError>;

    /// Deletes a learning session record.
    async fn delete_learning_session(&self, session_id: &str) -> Result<(), MnemoError>;
}
