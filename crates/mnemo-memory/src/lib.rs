// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory for Mnemo: content chunking, a SQLite vector index,
//! and the coordinator that keeps learning-session records and their
//! embedded chunks in step.

pub mod chunker;
pub mod coordinator;
pub mod embedder;
pub mod index;

pub use chunker::chunk_content;
pub use coordinator::MemoryCoordinator;
pub use embedder::{HashEmbedder, HASH_EMBEDDING_DIM};
pub use index::{blob_to_vec, cosine_similarity, vec_to_blob, VectorIndex};
