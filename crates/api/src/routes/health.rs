//! Liveness and readiness of the registry: database reachable and locker pool
//! fully seeded.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use locker_core::lockers::LOCKER_COUNT;
use locker_db::repositories::LockerRepo;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers and every locker row exists,
    /// `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    /// Locker rows present, `null` when the count query failed.
    pub lockers_seeded: Option<i64>,
    /// Size of the locker pool the registry expects.
    pub lockers_expected: i64,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let lockers_seeded = match LockerRepo::count(&state.pool).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not count lockers");
            None
        }
    };

    let status = if lockers_seeded == Some(LOCKER_COUNT) {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        lockers_seeded,
        lockers_expected: LOCKER_COUNT,
    })
}

/// Mount health check routes (root level, outside `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
