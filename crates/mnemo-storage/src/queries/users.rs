// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD operations.

use mnemo_core::{now_iso8601, MnemoError, User};
use rusqlite::params;

use crate::database::Database;

/// Fetch a user, creating the row on first reference.
pub async fn get_or_create_user(db: &Database, user_id: &str) -> Result<User, MnemoError> {
    let user_id = user_id.to_string();
    let now = now_iso8601();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO users (id, settings, created_at) VALUES (?1, '{}', ?2)",
                params![user_id, now],
            )?;
            let user = conn.query_row(
                "SELECT id, settings, created_at FROM users WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        settings: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )?;
            Ok(user)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Read a user's raw settings JSON string. Creates the user if missing.
pub async fn get_settings(db: &Database, user_id: &str) -> Result<String, MnemoError> {
    Ok(get_or_create_user(db, user_id).await?.settings)
}

/// Replace a user's settings JSON string.
pub async fn update_settings(
    db: &Database,
    user_id: &str,
    settings: String,
) -> Result<(), MnemoError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE users SET settings = ?1 WHERE id = ?2",
                params![settings, user_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
