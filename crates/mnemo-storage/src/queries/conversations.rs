// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation session and message operations.
//!
//! Each user has one current conversation session: the most recently
//! created one. It is resolved lazily and created on first write.
//! Clearing history deletes messages only; the session row persists.

use mnemo_core::{now_iso8601, ChatMessage, MnemoError, Role};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::database::Database;

/// Resolve the user's current (latest) session id, if any.
fn current_session_id(conn: &Connection, user_id: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT id FROM conversation_sessions
         WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC LIMIT 1",
        params![user_id],
        |row| row.get(0),
    )
    .optional()
}

/// Resolve the current session, creating one if the user has none.
fn resolve_or_create_session(conn: &Connection, user_id: &str) -> Result<String, rusqlite::Error> {
    if let Some(id) = current_session_id(conn, user_id)? {
        return Ok(id);
    }
    let id = Uuid::new_v4().to_string();
    let now = now_iso8601();
    conn.execute(
        "INSERT INTO conversation_sessions (id, user_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?3)",
        params![id, user_id, now],
    )?;
    Ok(id)
}

/// Append a message to the user's current conversation session.
pub async fn append_message(
    db: &Database,
    user_id: &str,
    role: Role,
    content: &str,
) -> Result<(), MnemoError> {
    let user_id = user_id.to_string();
    let content = content.to_string();
    db.connection()
        .call(move |conn| {
            let session_id = resolve_or_create_session(conn, &user_id)?;
            let now = now_iso8601();
            conn.execute(
                "INSERT INTO messages (id, session_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    Uuid::new_v4().to_string(),
                    session_id,
                    role.as_str(),
                    content,
                    now
                ],
            )?;
            conn.execute(
                "UPDATE conversation_sessions SET updated_at = ?1 WHERE id = ?2",
                params![now, session_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch the `limit` most recent messages of the user's current session,
/// returned in chronological order.
pub async fn recent_messages(
    db: &Database,
    user_id: &str,
    limit: usize,
) -> Result<Vec<ChatMessage>, MnemoError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let Some(session_id) = current_session_id(conn, &user_id)? else {
                return Ok(Vec::new());
            };
            let mut stmt = conn.prepare(
                "SELECT id, session_id, role, content, created_at FROM messages
                 WHERE session_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![session_id, limit as i64], |row| {
                let role: String = row.get(2)?;
                Ok(ChatMessage {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    role: Role::from_str_value(&role),
                    content: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            // Newest-first from the query; flip to chronological.
            messages.reverse();
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete all messages of the user's current session. The session row
/// itself is kept.
pub async fn clear_history(db: &Database, user_id: &str) -> Result<(), MnemoError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            if let Some(session_id) = current_session_id(conn, &user_id)? {
                conn.execute(
                    "DELETE FROM messages WHERE session_id = ?1",
                    params![session_id],
                )?;
            }
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::users;

    async fn setup_db() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        users::get_or_create_user(&db, "u1").await.unwrap();
        db
    }

    #[tokio::test]
    async fn history_is_empty_before_first_message() {
        let db = setup_db().await;
        let messages = recent_messages(&db, "u1", 10).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn append_creates_session_lazily() {
        let db = setup_db().await;

        append_message(&db, "u1", Role::User, "hello").await.unwrap();
        append_message(&db, "u1", Role::Assistant, "hi!").await.unwrap();

        let messages = recent_messages(&db, "u1", 10).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "hello");
        assert_eq!(messages[1].role, Role::Assistant);
        // Both landed in the same session.
        assert_eq!(messages[0].session_id, messages[1].session_id);
    }

    #[tokio::test]
    async fn limit_keeps_latest_in_chronological_order() {
        let db = setup_db().await;
        for i in 0..5 {
            append_message(&db, "u1", Role::User, &format!("m{i}"))
                .await
                .unwrap();
        }

        let messages = recent_messages(&db, "u1", 3).await.unwrap();
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn clear_removes_messages_but_keeps_session() {
        let db = setup_db().await;
        append_message(&db, "u1", Role::User, "hello").await.unwrap();

        clear_history(&db, "u1").await.unwrap();
        assert!(recent_messages(&db, "u1", 10).await.unwrap().is_empty());

        // Session row survives; the next message reuses it.
        let count: i64 = db
            .connection()
            .call(|conn| {
                let n = conn.query_row(
                    "SELECT count(*) FROM conversation_sessions",
                    [],
                    |row| row.get(0),
                )?;
                Ok::<_, rusqlite::Error>(n)
            })
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn users_do_not_share_sessions() {
        let db = setup_db().await;
        users::get_or_create_user(&db, "u2").await.unwrap();

        append_message(&db, "u1", Role::User, "from u1").await.unwrap();
        append_message(&db, "u2", Role::User, "from u2").await.unwrap();

        let u1 = recent_messages(&db, "u1", 10).await.unwrap();
        let u2 = recent_messages(&db, "u2", 10).await.unwrap();
        assert_eq!(u1.len(), 1);
        assert_eq!(u2.len(), 1);
        assert_eq!(u1[0].content, "from u1");
        assert_eq!(u2[0].content, "from u2");
    }
}
