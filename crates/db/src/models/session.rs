//! Admin session model and DTOs.

use locker_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `admin_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminSession {
    pub id: DbId,
    pub token_hash: String,
    pub username: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new admin session.
pub struct CreateSession {
    pub token_hash: String,
    pub username: String,
    pub expires_at: Timestamp,
}
