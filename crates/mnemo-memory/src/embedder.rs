// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic hashed bag-of-words embedder.
//!
//! Selected via `memory.embedding = "hash"`. Produces fixed-dimension
//! L2-normalized vectors with zero network calls, so tests and offline
//! shells get working (if crude) semantic retrieval: texts sharing
//! words land close together, disjoint texts do not.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;

use mnemo_core::{AdapterType, EmbeddingAdapter, HealthStatus, MnemoError, PluginAdapter};

/// Dimension of hashed embeddings.
pub const HASH_EMBEDDING_DIM: usize = 256;

/// Local embedding adapter hashing word tokens into a fixed vector.
#[derive(Default)]
pub struct HashEmbedder;

impl HashEmbedder {
    pub fn new() -> Self {
        Self
    }

    fn embed_text(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; HASH_EMBEDDING_DIM];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let idx = (hasher.finish() % HASH_EMBEDDING_DIM as u64) as usize;
            vector[idx] += 1.0;
        }
        l2_normalize(&vector)
    }
}

fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl PluginAdapter for HashEmbedder {
    fn name(&self) -> &str {
        "hash-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MnemoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MnemoError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, MnemoError> {
        Ok(Self::embed_text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::cosine_similarity;

    #[tokio::test]
    async fn embedding_is_deterministic() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("rust has ownership").await.unwrap();
        let b = embedder.embed("rust has ownership").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), HASH_EMBEDDING_DIM);
    }

    #[tokio::test]
    async fn embedding_is_normalized() {
        let embedder = HashEmbedder::new();
        let v = embedder.embed("some words here").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn shared_words_score_higher_than_disjoint() {
        let embedder = HashEmbedder::new();
        let base = embedder.embed("python uses indentation").await.unwrap();
        let related = embedder.embed("python indentation rules").await.unwrap();
        let unrelated = embedder.embed("quarterly revenue forecast").await.unwrap();

        assert!(
            cosine_similarity(&base, &related) > cosine_similarity(&base, &unrelated),
            "related text should rank above unrelated text"
        );
    }

    #[tokio::test]
    async fn empty_text_embeds_to_zero_vector() {
        let embedder = HashEmbedder::new();
        let v = embedder.embed("").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn tokenization_ignores_case_and_punctuation() {
        let embedder = HashEmbedder::new();
        let a = embedder.embed("Hello, World!").await.unwrap();
        let b = embedder.embed("hello world").await.unwrap();
        assert_eq!(a, b);
    }
}
