//! Route definitions for the `/lockers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::locker;
use crate::state::AppState;

/// Routes mounted at `/api`.
///
/// ```text
/// GET    /lockers               -> list
/// GET    /lockers/{locker_no}   -> get_by_no
/// PUT    /lockers/{locker_no}   -> update
/// DELETE /lockers/{locker_no}   -> clear
/// GET    /stats                 -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lockers", get(locker::list))
        .route(
            "/lockers/{locker_no}",
            get(locker::get_by_no)
                .put(locker::update)
                .delete(locker::clear),
        )
        .route("/stats", get(locker::stats))
}
