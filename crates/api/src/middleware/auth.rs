//! Session-cookie authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::Utc;
use locker_core::error::CoreError;
use locker_core::types::DbId;
use locker_db::models::session::AdminSession;
use locker_db::repositories::SessionRepo;

use crate::auth::session::{hash_session_token, token_from_headers};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Admin authenticated through the session cookie.
///
/// Use this as an extractor parameter in any handler that requires login:
///
/// ```ignore
/// async fn my_handler(admin: AdminUser) -> AppResult<Json<()>> {
///     tracing::info!(username = %admin.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// The `admin_sessions` row id backing this request.
    pub session_id: DbId,
    /// The username the session was opened with.
    pub username: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = find_session(state, &parts.headers).await?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Login required: missing or expired session".into(),
            ))
        })?;

        Ok(AdminUser {
            session_id: session.id,
            username: session.username,
        })
    }
}

/// Look up the active session named by the request's session cookie.
///
/// Returns `Ok(None)` when there is no cookie or it does not match a live
/// session.
pub async fn find_session(state: &AppState, headers: &HeaderMap) -> AppResult<Option<AdminSession>> {
    let Some(token) = token_from_headers(headers, &state.config.auth.cookie_name) else {
        return Ok(None);
    };

    let hash = hash_session_token(&token);
    let session = SessionRepo::find_active_by_token_hash(&state.pool, &hash, Utc::now()).await?;
    Ok(session)
}
