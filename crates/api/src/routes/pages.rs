//! Route definitions for the HTML pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

/// Routes mounted at the root, outside `/api`.
///
/// ```text
/// GET /            -> index (redirects to /login without a session)
/// GET /index.html  -> index
/// GET /login       -> login (redirects to / with a session)
/// GET /login.html  -> login
/// ```
///
/// The `.html` paths are routed here so the asset fallback cannot serve the
/// pages without the session check.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/index.html", get(pages::index))
        .route("/login", get(pages::login))
        .route("/login.html", get(pages::login))
}
