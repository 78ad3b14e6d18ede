// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types, errors, and adapter traits shared across the Mnemo
//! workspace.
//!
//! This crate has no I/O of its own. Backends (SQLite storage, the
//! OpenRouter provider, the vector index) implement the traits defined
//! here; the agent orchestrates through them.

pub mod error;
pub mod traits;
pub mod types;

pub use error::MnemoError;
pub use traits::{CompletionProvider, EmbeddingAdapter, PluginAdapter, SessionStore};
pub use traits::provider::CompletionRequest;
pub use types::{
    AdapterType, ChatMessage, ConversationSession, HealthStatus, LearningSession,
    LearningSessionSummary, MemoryHit, Role, User, VectorChunk, now_iso8601,
};
