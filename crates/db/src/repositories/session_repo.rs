//! Repository for the `admin_sessions` table.

use locker_core::types::{DbId, Timestamp};
use sqlx::SqlitePool;

use crate::models::session::{AdminSession, CreateSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token_hash, username, expires_at, is_revoked, created_at";

/// Provides CRUD operations for admin sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateSession,
    ) -> Result<AdminSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_sessions (token_hash, username, expires_at, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(&input.token_hash)
            .bind(&input.username)
            .bind(input.expires_at)
            .bind(chrono::Utc::now())
            .fetch_one(pool)
            .await
    }

    /// Find a session by its token hash that is neither revoked nor expired at `now`.
    ///
    /// Timestamps are stored as RFC 3339 UTC text, so they compare correctly as strings.
    pub async fn find_active_by_token_hash(
        pool: &SqlitePool,
        hash: &str,
        now: Timestamp,
    ) -> Result<Option<AdminSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_sessions
             WHERE token_hash = ?
               AND is_revoked = 0
               AND expires_at > ?"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session. Returns `true` if the row was updated.
    pub async fn revoke(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admin_sessions SET is_revoked = 1 WHERE id = ? AND is_revoked = 0",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete sessions that expired before `now` or were revoked.
    /// Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &SqlitePool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= ? OR is_revoked = 1")
                .bind(now)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
