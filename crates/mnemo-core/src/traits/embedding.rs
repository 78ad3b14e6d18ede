// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::MnemoError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for converting text into an embedding vector.
///
/// Embedding adapters power the vector index behind semantic memory
/// retrieval. Implementations must be deterministic per input for a
/// given model so that re-indexing is stable.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Generates an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError>;
}
