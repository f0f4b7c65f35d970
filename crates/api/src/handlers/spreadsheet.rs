//! Handlers for spreadsheet import and export.

use axum::extract::{Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;
use locker_core::lockers::is_valid_locker_no;
use locker_core::spreadsheet::{
    export_filename, is_allowed_upload, read_workbook, write_workbook, SheetRow,
    XLSX_CONTENT_TYPE,
};
use locker_db::models::locker::Locker;
use locker_db::repositories::LockerRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::state::AppState;

/// Name of the multipart field carrying the workbook.
pub const UPLOAD_FIELD: &str = "file";

/// Result of `POST /api/import-excel`.
#[derive(Debug, Serialize)]
pub struct ImportSummary {
    /// Rows written to an existing locker.
    pub imported: u64,
    /// Rows ignored because the locker number was blank or out of range.
    pub skipped: usize,
}

/// POST /api/import-excel
///
/// Accepts a multipart upload with the workbook in the `file` field and
/// overwrites the matching lockers in a single transaction.
pub async fn import_excel(
    State(state): State<AppState>,
    admin: AdminUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;
    if filename.trim().is_empty() {
        return Err(AppError::BadRequest("No file selected".into()));
    }
    if !is_allowed_upload(&filename) {
        return Err(AppError::BadRequest(
            "Invalid file type. Please upload an .xlsx or .xls file".into(),
        ));
    }

    let parsed = read_workbook(&data)?;
    let (rows, out_of_range): (Vec<SheetRow>, Vec<SheetRow>) = parsed
        .rows
        .into_iter()
        .partition(|row| is_valid_locker_no(row.locker_no));

    let imported = LockerRepo::import_rows(&state.pool, &rows).await?;
    let skipped = parsed.blank_rows + out_of_range.len();

    tracing::info!(
        %filename,
        bytes = data.len(),
        imported,
        skipped,
        session_id = admin.session_id,
        username = %admin.username,
        "Spreadsheet imported",
    );

    Ok(Json(ImportSummary { imported, skipped }))
}

/// GET /api/export-excel
///
/// Streams every locker as an `.xlsx` attachment named after the current
/// local time.
pub async fn export_excel(
    State(state): State<AppState>,
    admin: AdminUser,
) -> AppResult<impl IntoResponse> {
    let lockers = LockerRepo::list_all(&state.pool).await?;
    let rows: Vec<SheetRow> = lockers.iter().map(Locker::to_sheet_row).collect();
    let bytes = write_workbook(&rows)?;
    let filename = export_filename(Local::now().naive_local());

    tracing::info!(
        %filename,
        rows = rows.len(),
        session_id = admin.session_id,
        username = %admin.username,
        "Spreadsheet exported",
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
