//! Handlers for login, logout and the session check.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use locker_core::error::CoreError;
use locker_core::types::Timestamp;
use locker_db::models::session::CreateSession;
use locker_db::repositories::SessionRepo;
use serde::{Deserialize, Serialize};

use crate::auth::session::{expired_session_cookie, generate_session_token, session_cookie};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::find_session;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response. The session itself travels in the cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
    pub expires_at: Timestamp,
}

/// Response for `GET /api/check-auth`.
#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub logged_in: bool,
    pub username: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/login
///
/// Check the admin credential and open a session. Any session the browser
/// already holds is revoked first.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(username = %input.username, "Login attempt");

    if !state.config.auth.matches(&input.username, &input.password) {
        tracing::warn!(username = %input.username, "Login rejected");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    if let Some(previous) = find_session(&state, &headers).await? {
        SessionRepo::revoke(&state.pool, previous.id).await?;
    }

    let now = Utc::now();
    let purged = SessionRepo::cleanup_expired(&state.pool, now).await?;

    let expires_at = Duration::try_hours(state.config.auth.session_ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::InternalError(format!(
                "session TTL of {} hours overflows",
                state.config.auth.session_ttl_hours
            ))
        })?;

    let (token, token_hash) = generate_session_token();
    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            token_hash,
            username: input.username,
            expires_at,
        },
    )
    .await?;

    tracing::info!(session_id = session.id, purged, "Login successful");

    let cookie = session_cookie(&state.config.auth, &token);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            username: session.username,
            expires_at: session.expires_at,
        }),
    ))
}

/// POST /api/logout
///
/// Revoke the current session, if any, and expire the cookie. Returns 204.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(session) = find_session(&state, &headers).await? {
        SessionRepo::revoke(&state.pool, session.id).await?;
        tracing::info!(session_id = session.id, "Logged out");
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, expired_session_cookie(&state.config.auth))],
    ))
}

/// GET /api/check-auth
pub async fn check_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<AuthStatus>> {
    let session = find_session(&state, &headers).await?;
    tracing::debug!(logged_in = session.is_some(), "Auth check");

    Ok(Json(AuthStatus {
        logged_in: session.is_some(),
        username: session.map(|s| s.username),
    }))
}
