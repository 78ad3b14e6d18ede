// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory coordinator: the façade over the session store and the
//! vector index.
//!
//! Create writes the learning-session record before indexing chunks, so
//! a mid-flight embedding failure leaves a record without vectors (the
//! memory exists but is not yet retrievable) rather than orphaned
//! vectors. Delete removes vectors before the record and attempts both
//! sides even if the first fails.

use std::sync::Arc;

use tracing::{debug, warn};

use mnemo_config::model::MemoryConfig;
use mnemo_core::{EmbeddingAdapter, MemoryHit, MnemoError, SessionStore, VectorChunk};

use crate::chunker::chunk_content;
use crate::index::VectorIndex;

/// Orchestrates learning-session records and their embedded chunks.
pub struct MemoryCoordinator {
    store: Arc<dyn SessionStore>,
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingAdapter>,
    max_chunk_size: usize,
    retrieval_limit: usize,
}

impl MemoryCoordinator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        index: Arc<VectorIndex>,
        embedder: Arc<dyn EmbeddingAdapter>,
        config: &MemoryConfig,
    ) -> Self {
        Self {
            store,
            index,
            embedder,
            max_chunk_size: config.max_chunk_size,
            retrieval_limit: config.retrieval_limit,
        }
    }

    /// Learn new content under `name`: persist the record, then chunk,
    /// embed, and index it. Returns the new session id.
    pub async fn create_memory(
        &self,
        user_id: &str,
        name: &str,
        content: &str,
        description: Option<&str>,
        source: Option<&str>,
    ) -> Result<String, MnemoError> {
        let session_id = self
            .store
            .create_learning_session(user_id, name, content, description, source)
            .await?;

        let total = self.index_chunks(&session_id, content).await?;
        debug!(session_id = %session_id, chunks = total, "memory created");
        Ok(session_id)
    }

    /// Replace the content of the memory named `name`: update the record,
    /// then rebuild its chunk set. Returns the session id, or `None` if
    /// the user has no memory with that name.
    pub async fn update_memory(
        &self,
        user_id: &str,
        name: &str,
        content: &str,
        description: Option<&str>,
    ) -> Result<Option<String>, MnemoError> {
        let Some(session) = self.store.get_learning_session_by_name(user_id, name).await? else {
            return Ok(None);
        };

        self.store
            .update_learning_session(&session.id, content, description)
            .await?;
        self.index.delete_for_session(&session.id).await?;
        let total = self.index_chunks(&session.id, content).await?;

        debug!(session_id = %session.id, chunks = total, "memory updated");
        Ok(Some(session.id))
    }

    /// Chunk, embed, and index `content` under `session_id`. Returns the
    /// number of chunks written.
    async fn index_chunks(&self, session_id: &str, content: &str) -> Result<usize, MnemoError> {
        let chunks = chunk_content(content, self.max_chunk_size);
        let total = chunks.len();
        for (i, chunk_text) in chunks.into_iter().enumerate() {
            let embedding = self.embedder.embed(&chunk_text).await?;
            let chunk = VectorChunk {
                id: format!("{session_id}_{i}"),
                session_id: session_id.to_string(),
                chunk_index: i,
                total_chunks: total,
                content: chunk_text,
            };
            self.index.add(&chunk, &embedding).await?;
        }
        Ok(total)
    }

    /// Forget the memory named `name`. Returns the forgotten session's
    /// name, or `None` if the user has no memory with that name.
    ///
    /// Vectors are removed first; the record delete is attempted even
    /// when vector removal fails, and the first failure is reported.
    pub async fn delete_memory(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<String>, MnemoError> {
        let Some(session) = self.store.get_learning_session_by_name(user_id, name).await? else {
            return Ok(None);
        };

        let chunk_result = self.index.delete_for_session(&session.id).await;
        let record_result = self.store.delete_learning_session(&session.id).await;

        match chunk_result {
            Ok(removed) => debug!(session_id = %session.id, removed, "memory vectors deleted"),
            Err(ref e) => warn!(session_id = %session.id, error = %e, "vector delete failed"),
        }
        chunk_result?;
        record_result?;
        Ok(Some(session.name))
    }

    /// Retrieve the memory chunks most relevant to `query`.
    ///
    /// Hits whose learning session no longer resolves are dropped, as
    /// are hits belonging to other users.
    pub async fn get_relevant_memories(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<MemoryHit>, MnemoError> {
        let query_embedding = self.embedder.embed(query).await?;
        let scored = self.index.search(&query_embedding, self.retrieval_limit).await?;

        let mut hits = Vec::with_capacity(scored.len());
        for (chunk, relevance) in scored {
            let Some(session) = self.store.get_learning_session(&chunk.session_id).await? else {
                warn!(session_id = %chunk.session_id, "dropping hit for unresolvable session");
                continue;
            };
            if session.user_id != user_id {
                continue;
            }
            hits.push(MemoryHit {
                content: chunk.content,
                session_name: session.name,
                relevance,
                session_id: chunk.session_id,
            });
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;
    use async_trait::async_trait;
    use mnemo_core::{AdapterType, HealthStatus, PluginAdapter};
    use mnemo_storage::MemoryStore;

    /// Embedding adapter whose backend is permanently unreachable.
    struct FailingEmbedder;

    #[async_trait]
    impl PluginAdapter for FailingEmbedder {
        fn name(&self) -> &str {
            "failing-embedder"
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
    impl EmbeddingAdapter for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, MnemoError> {
            Err(MnemoError::Provider {
                message: "embedding backend offline".to_string(),
                source: None,
            })
        }
    }

    async fn setup() -> MemoryCoordinator {
        let store = Arc::new(MemoryStore::new());
        store.get_or_create_user("u1").await.unwrap();
        let index = Arc::new(VectorIndex::open_in_memory().await.unwrap());
        let config = MemoryConfig {
            max_chunk_size: 20,
            retrieval_limit: 3,
            ..Default::default()
        };
        MemoryCoordinator::new(store, index, Arc::new(HashEmbedder::new()), &config)
    }

    #[tokio::test]
    async fn create_indexes_all_chunks() {
        let coordinator = setup().await;

        let content = "Python uses whitespace. Functions use def keyword. Lists are mutable.";
        let id = coordinator
            .create_memory("u1", "py_basics", content, None, None)
            .await
            .unwrap();

        let record = coordinator
            .store
            .get_learning_session(&id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "py_basics");
        // Content exceeds the 20-char chunk bound, so it was split.
        assert!(coordinator.index.count().await.unwrap() > 1);
    }

    #[tokio::test]
    async fn recall_finds_learned_content() {
        let coordinator = setup().await;
        coordinator
            .create_memory(
                "u1",
                "py_basics",
                "Python uses whitespace indentation. Functions are defined with def.",
                None,
                None,
            )
            .await
            .unwrap();

        let hits = coordinator
            .get_relevant_memories("u1", "how are functions defined")
            .await
            .unwrap();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.session_name == "py_basics"));
        assert!(hits.iter().any(|h| h.content.contains("def")));
    }

    #[tokio::test]
    async fn delete_removes_record_and_vectors() {
        let coordinator = setup().await;
        coordinator
            .create_memory("u1", "topic", "Some learned content here.", None, None)
            .await
            .unwrap();
        assert!(coordinator.index.count().await.unwrap() > 0);

        let deleted = coordinator.delete_memory("u1", "topic").await.unwrap();
        assert_eq!(deleted.as_deref(), Some("topic"));
        assert_eq!(coordinator.index.count().await.unwrap(), 0);
        assert!(coordinator
            .store
            .get_learning_session_by_name("u1", "topic")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn update_replaces_content_and_vectors() {
        let coordinator = setup().await;
        coordinator
            .create_memory("u1", "topic", "The old content mentions giraffes.", None, None)
            .await
            .unwrap();

        let id = coordinator
            .update_memory("u1", "topic", "The new content mentions penguins.", None)
            .await
            .unwrap()
            .unwrap();

        let record = coordinator
            .store
            .get_learning_session(&id)
            .await
            .unwrap()
            .unwrap();
        assert!(record.content.contains("penguins"));

        let hits = coordinator
            .get_relevant_memories("u1", "giraffes")
            .await
            .unwrap();
        assert!(hits.iter().all(|h| !h.content.contains("giraffes")));
        let hits = coordinator
            .get_relevant_memories("u1", "penguins")
            .await
            .unwrap();
        assert!(hits.iter().any(|h| h.content.contains("penguins")));
    }

    #[tokio::test]
    async fn update_unknown_name_returns_none() {
        let coordinator = setup().await;
        let updated = coordinator
            .update_memory("u1", "missing", "content", None)
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn create_failure_after_record_write_keeps_record() {
        let store = Arc::new(MemoryStore::new());
        store.get_or_create_user("u1").await.unwrap();
        let index = Arc::new(VectorIndex::open_in_memory().await.unwrap());
        let config = MemoryConfig {
            max_chunk_size: 20,
            ..Default::default()
        };
        let coordinator = MemoryCoordinator::new(
            store.clone(),
            Arc::clone(&index),
            Arc::new(FailingEmbedder),
            &config,
        );

        let err = coordinator
            .create_memory("u1", "topic", "Content that never gets embedded.", None, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("offline"), "got: {err}");

        // The record survives without vectors: the memory exists but is
        // not yet retrievable.
        assert!(store
            .get_learning_session_by_name("u1", "topic")
            .await
            .unwrap()
            .is_some());
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_reports_vector_failure_but_still_removes_record() {
        let coordinator = setup().await;
        coordinator
            .create_memory("u1", "topic", "Short content.", None, None)
            .await
            .unwrap();

        // Break the index out from under the coordinator.
        coordinator
            .index
            .connection()
            .call(|conn| {
                conn.execute_batch("DROP TABLE chunks")?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        let err = coordinator.delete_memory("u1", "topic").await.unwrap_err();
        assert!(matches!(err, MnemoError::Storage { .. }));

        // The record delete was still attempted, and succeeded.
        assert!(coordinator
            .store
            .get_learning_session_by_name("u1", "topic")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_unknown_name_returns_none() {
        let coordinator = setup().await;
        let deleted = coordinator.delete_memory("u1", "nothing").await.unwrap();
        assert!(deleted.is_none());
    }

    #[tokio::test]
    async fn recall_does_not_leak_other_users_memories() {
        let coordinator = setup().await;
        coordinator.store.get_or_create_user("u2").await.unwrap();
        coordinator
            .create_memory("u2", "secret", "the launch codes are hidden", None, None)
            .await
            .unwrap();

        let hits = coordinator
            .get_relevant_memories("u1", "launch codes")
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn stale_vectors_are_dropped_from_recall() {
        let coordinator = setup().await;
        let id = coordinator
            .create_memory("u1", "topic", "orphaned vector content", None, None)
            .await
            .unwrap();

        // Delete the record directly, leaving vectors behind.
        coordinator.store.delete_learning_session(&id).await.unwrap();

        let hits = coordinator
            .get_relevant_memories("u1", "orphaned vector content")
            .await
            .unwrap();
        assert!(hits.is_empty());
    }
}
