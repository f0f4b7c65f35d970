//! Route definitions for spreadsheet import and export.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::spreadsheet;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// POST /import-excel  -> import_excel (body capped at `max_upload_bytes`)
/// GET  /export-excel  -> export_excel
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/import-excel",
            post(spreadsheet::import_excel).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/export-excel", get(spreadsheet::export_excel))
}
