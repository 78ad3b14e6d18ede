// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Learning session CRUD operations.
//!
//! Names are not unique: a user may learn two topics under the same
//! name. Name lookups return the earliest-created match.

use mnemo_core::{now_iso8601, LearningSession, LearningSessionSummary, MnemoError};
use rusqlite::{params, OptionalExtension, Row};

use crate::database::Database;

fn row_to_session(row: &Row<'_>) -> Result<LearningSession, rusqlite::Error> {
    Ok(LearningSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        content: row.get(4)?,
        source: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const SESSION_COLUMNS: &str =
    "id, user_id, name, description, content, source, created_at, updated_at";

/// Insert a learning session record.
pub async fn create(db: &Database, session: &LearningSession) -> Result<(), MnemoError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO learning_sessions
                 (id, user_id, name, description, content, source, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    session.id,
                    session.user_id,
                    session.name,
                    session.description,
                    session.content,
                    session.source,
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a learning session by id.
pub async fn get_by_id(
    db: &Database,
    session_id: &str,
) -> Result<Option<LearningSession>, MnemoError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn
                .query_row(
                    &format!("SELECT {SESSION_COLUMNS} FROM learning_sessions WHERE id = ?1"),
                    params![session_id],
                    row_to_session,
                )
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch a learning session by `(user_id, name)`, earliest created first.
pub async fn get_by_name(
    db: &Database,
    user_id: &str,
    name: &str,
) -> Result<Option<LearningSession>, MnemoError> {
    let user_id = user_id.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn
                .query_row(
                    &format!(
                        "SELECT {SESSION_COLUMNS} FROM learning_sessions
                         WHERE user_id = ?1 AND name = ?2
                         ORDER BY created_at ASC, rowid ASC LIMIT 1"
                    ),
                    params![user_id, name],
                    row_to_session,
                )
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List learning-session metadata for a user, newest first.
pub async fn list_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<LearningSessionSummary>, MnemoError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, coalesce(description, ''), created_at
                 FROM learning_sessions
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(LearningSessionSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?;
            let mut sessions = Vec::new();
            for row in rows {
                sessions.push(row?);
            }
            Ok(sessions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace a session's content (and optionally description).
pub async fn update(
    db: &Database,
    session_id: &str,
    content: &str,
    description: Option<&str>,
) -> Result<(), MnemoError> {
    let session_id = session_id.to_string();
    let content = content.to_string();
    let description = description.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let now = now_iso8601();
            match description {
                Some(desc) => {
                    conn.execute(
                        "UPDATE learning_sessions
                         SET content = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
                        params![content, desc, now, session_id],
                    )?;
                }
                None => {
                    conn.execute(
                        "UPDATE learning_sessions
                         SET content = ?1, updated_at = ?2 WHERE id = ?3",
                        params![content, now, session_id],
                    )?;
                }
            }
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a learning session record.
pub async fn delete(db: &Database, session_id: &str) -> Result<(), MnemoError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "DELETE FROM learning_sessions WHERE id = ?1",
                params![session_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
