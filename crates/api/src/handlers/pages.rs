//! Session-gated HTML pages of the browser frontend.
//!
//! The pages are read from `STATIC_DIR`; everything else in that directory is
//! served as plain assets by the router's fallback.

use std::io::ErrorKind;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::find_session;
use crate::state::AppState;

pub const INDEX_PAGE: &str = "index.html";
pub const LOGIN_PAGE: &str = "login.html";

/// GET /
///
/// The locker table. Anonymous visitors are sent to the login page.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if find_session(&state, &headers).await?.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }
    page(&state, INDEX_PAGE).await
}

/// GET /login
///
/// The login form. Visitors who already hold a session go straight to `/`.
pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if find_session(&state, &headers).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    page(&state, LOGIN_PAGE).await
}

async fn page(state: &AppState, name: &str) -> AppResult<Response> {
    let Some(dir) = &state.config.static_dir else {
        return Err(AppError::NotFound("Page not found".into()));
    };

    match tokio::fs::read_to_string(dir.join(name)).await {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(page = name, dir = %dir.display(), "Frontend page missing");
            Err(AppError::NotFound("Page not found".into()))
        }
        Err(e) => Err(AppError::InternalError(format!("reading {name}: {e}"))),
    }
}
