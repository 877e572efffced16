//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`. All require dashboard access.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(dashboard::summary))
        .route("/voters-by-hour", get(dashboard::voters_by_hour_handler))
        .route(
            "/dirigente-performance",
            get(dashboard::dirigente_performance),
        )
        .route("/barrio-coverage", get(dashboard::barrio_coverage_handler))
}
