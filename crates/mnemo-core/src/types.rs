// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types shared across the Mnemo workspace.
//!
//! Timestamps are ISO 8601 strings throughout, matching the SQLite
//! `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')` default used by the storage
//! layer.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifies the type of adapter behind a [`crate::traits::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Provider,
    Embedding,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A chat user, identified by the opaque id assigned by the chat platform.
///
/// Users are created lazily on first reference and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Free-form preferences as a JSON object string.
    pub settings: String,
    pub created_at: String,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Convert to string for SQLite storage and prompt rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse from SQLite string. Unknown values default to `User`.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

/// A single message in a conversation session. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub session_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

/// The rolling container for one user's chat history.
///
/// Exactly one "current" session per user is resolved lazily: the most
/// recently created session wins, and one is created on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub id: String,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A named, user-created unit of content to be recalled later.
///
/// `(user_id, name)` is the lookup key for recall but is not unique at the
/// storage layer; duplicate names resolve to the earliest-created match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSession {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub content: String,
    /// Origin URL when the content was scraped from the web.
    pub source: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Lightweight learning-session metadata for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSessionSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

/// A bounded-size fragment of a learning session's content, stored in the
/// vector index alongside its embedding.
///
/// The id is derived as `"{session_id}_{chunk_index}"`. The `session_id` is
/// a back-reference only -- the index never rejects orphans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorChunk {
    pub id: String,
    pub session_id: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub content: String,
}

/// A memory retrieval result: a chunk resolved back to its owning session.
#[derive(Debug, Clone)]
pub struct MemoryHit {
    pub content: String,
    pub session_name: String,
    /// Raw similarity score from the index, passed through unnormalized.
    /// For the cosine metric, higher means more similar.
    pub relevance: f32,
    pub session_id: String,
}

/// Current UTC time as an ISO 8601 string with millisecond precision.
pub fn now_iso8601() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
