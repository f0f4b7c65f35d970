//! Handlers for the `/lockers` resource and the occupancy counters.

use axum::extract::State;
use axum::Json;
use locker_core::error::CoreError;
use locker_core::lockers::StatusFilter;
use locker_core::types::LockerNo;
use locker_db::models::locker::{Locker, LockerListParams, LockerStats, UpdateLocker};
use locker_db::repositories::LockerRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::AdminUser;
use crate::state::AppState;

/// Query parameters for `GET /api/lockers`.
///
/// `status` is kept as a raw string so an unknown value surfaces as a
/// validation error naming the accepted values.
#[derive(Debug, Deserialize)]
pub struct LockerQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

fn not_found(locker_no: LockerNo) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Locker",
        id: locker_no,
    })
}

/// GET /api/lockers?search=&status=
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(query): AppQuery<LockerQuery>,
) -> AppResult<Json<Vec<Locker>>> {
    let status: StatusFilter = query.status.as_deref().unwrap_or_default().parse()?;
    let params = LockerListParams {
        search: query.search,
        status,
    };

    let lockers = LockerRepo::list(&state.pool, &params).await?;
    tracing::debug!(count = lockers.len(), ?status, "Listed lockers");
    Ok(Json(lockers))
}

/// GET /api/lockers/{locker_no}
pub async fn get_by_no(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(locker_no): AppPath<LockerNo>,
) -> AppResult<Json<Locker>> {
    let locker = LockerRepo::find_by_no(&state.pool, locker_no)
        .await?
        .ok_or_else(|| not_found(locker_no))?;
    Ok(Json(locker))
}

/// PUT /api/lockers/{locker_no}
///
/// Overwrites every assignment field; fields missing from the body are
/// stored as empty strings.
pub async fn update(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(locker_no): AppPath<LockerNo>,
    AppJson(input): AppJson<UpdateLocker>,
) -> AppResult<Json<Locker>> {
    let locker = LockerRepo::update(&state.pool, locker_no, &input)
        .await?
        .ok_or_else(|| not_found(locker_no))?;

    tracing::info!(
        locker_no,
        is_empty = locker.is_empty,
        session_id = admin.session_id,
        username = %admin.username,
        "Locker updated",
    );
    Ok(Json(locker))
}

/// DELETE /api/lockers/{locker_no}
///
/// Clears the assignment. The locker row itself always stays.
pub async fn clear(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(locker_no): AppPath<LockerNo>,
) -> AppResult<Json<Locker>> {
    let locker = LockerRepo::clear(&state.pool, locker_no)
        .await?
        .ok_or_else(|| not_found(locker_no))?;

    tracing::info!(
        locker_no,
        session_id = admin.session_id,
        username = %admin.username,
        "Locker cleared",
    );
    Ok(Json(locker))
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<LockerStats>> {
    let stats = LockerRepo::stats(&state.pool).await?;
    Ok(Json(stats))
}
