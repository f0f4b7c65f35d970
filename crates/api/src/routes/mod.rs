pub mod auth;
pub mod health;
pub mod locker;
pub mod pages;
pub mod spreadsheet;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /login                          login (public)
/// /logout                         logout (public)
/// /check-auth                     session check (public)
///
/// /lockers                        list (?search=&status=)
/// /lockers/{locker_no}            get, update, clear
/// /stats                          occupancy counters (public)
///
/// /import-excel                   multipart upload
/// /export-excel                   xlsx download
/// ```
///
/// Every route not marked public requires an admin session.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(locker::router())
        .merge(spreadsheet::router(max_upload_bytes))
}
