// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed vector index with BLOB embedding storage.
//!
//! Chunks are tagged with the learning session they belong to, so a
//! whole session can be evicted in one statement. Search is a
//! brute-force cosine scan, which is fine at personal-assistant scale.

use rusqlite::params;
use tokio_rusqlite::Connection;

use mnemo_core::{now_iso8601, MnemoError, VectorChunk};

/// Helper to convert tokio_rusqlite errors into MnemoError::Storage.
fn storage_err(e: tokio_rusqlite::Error) -> MnemoError {
    MnemoError::Storage {
        source: Box::new(e),
    }
}

fn open_err(e: rusqlite::Error) -> MnemoError {
    MnemoError::Storage {
        source: Box::new(e),
    }
}

/// Convert an f32 vector to a little-endian BLOB for SQLite storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert a SQLite BLOB back to an f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-norm inputs, so a single
/// degenerate embedding cannot poison a search.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS chunks (
    id           TEXT PRIMARY KEY,
    session_id   TEXT NOT NULL,
    chunk_index  INTEGER NOT NULL,
    total_chunks INTEGER NOT NULL,
    content      TEXT NOT NULL,
    embedding    BLOB NOT NULL,
    created_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_chunks_session ON chunks(session_id);
";

/// Persistent vector index for embedded memory chunks.
pub struct VectorIndex {
    conn: Connection,
}

impl VectorIndex {
    /// Open (or create) the index at `path`.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, MnemoError> {
        let conn = Connection::open(path).await.map_err(open_err)?;
        Self::configure(&conn, wal_mode).await?;
        Ok(Self { conn })
    }

    /// Open a private in-memory index. Used by tests and the `memory`
    /// storage backend.
    pub async fn open_in_memory() -> Result<Self, MnemoError> {
        let conn = Connection::open_in_memory().await.map_err(open_err)?;
        Self::configure(&conn, false).await?;
        Ok(Self { conn })
    }

    async fn configure(conn: &Connection, wal_mode: bool) -> Result<(), MnemoError> {
        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.busy_timeout(std::time::Duration::from_secs(5))?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(storage_err)
    }

    /// Insert one embedded chunk.
    pub async fn add(&self, chunk: &VectorChunk, embedding: &[f32]) -> Result<(), MnemoError> {
        let chunk = chunk.clone();
        let blob = vec_to_blob(embedding);
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO chunks
                     (id, session_id, chunk_index, total_chunks, content, embedding, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        chunk.id,
                        chunk.session_id,
                        chunk.chunk_index as i64,
                        chunk.total_chunks as i64,
                        chunk.content,
                        blob,
                        now_iso8601(),
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }

    /// Brute-force cosine search over all stored chunks.
    ///
    /// Returns up to `limit` `(chunk, similarity)` pairs, most similar
    /// first.
    pub async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<(VectorChunk, f32)>, MnemoError> {
        let query = query_embedding.to_vec();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, session_id, chunk_index, total_chunks, content, embedding
                     FROM chunks",
                )?;
                let rows = stmt.query_map([], |row| {
                    let blob: Vec<u8> = row.get(5)?;
                    let chunk = VectorChunk {
                        id: row.get(0)?,
                        session_id: row.get(1)?,
                        chunk_index: row.get::<_, i64>(2)? as usize,
                        total_chunks: row.get::<_, i64>(3)? as usize,
                        content: row.get(4)?,
                    };
                    Ok((chunk, blob_to_vec(&blob)))
                })?;

                let mut scored = Vec::new();
                for row in rows {
                    let (chunk, embedding) = row?;
                    let score = cosine_similarity(&query, &embedding);
                    scored.push((chunk, score));
                }
                scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                scored.truncate(limit);
                Ok(scored)
            })
            .await
            .map_err(storage_err)
    }

    /// Delete every chunk belonging to a learning session. Returns the
    /// number of chunks removed.
    pub async fn delete_for_session(&self, session_id: &str) -> Result<usize, MnemoError> {
        let session_id = session_id.to_string();
        self.conn
            .call(move |conn| {
                let n = conn.execute(
                    "DELETE FROM chunks WHERE session_id = ?1",
                    params![session_id],
                )?;
                Ok(n)
            })
            .await
            .map_err(storage_err)
    }

    /// Total number of stored chunks.
    pub async fn count(&self) -> Result<usize, MnemoError> {
        self.conn
            .call(|conn| {
                let n: i64 = conn.query_row("SELECT count(*) FROM chunks", [], |row| row.get(0))?;
                Ok(n as usize)
            })
            .await
            .map_err(storage_err)
    }

    /// Test-only access to the underlying connection, for fault
    /// injection.
    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), MnemoError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }
}
