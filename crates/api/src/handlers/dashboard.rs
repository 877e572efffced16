//! Handlers for the `/dashboard` aggregation endpoints.
//!
//! Each endpoint fetches the raw rows for the caller's organization and
//! delegates the arithmetic to the pure aggregators in `electo_core::stats`.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use electo_core::stats::{
    barrio_coverage, rank_dirigentes, voters_by_hour, BarrioCoverage, DirigentePerformance,
    HourBucket,
};
use electo_core::status::VehicleStatus;
use electo_db::repositories::{VehicleRepo, VoterRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::capabilities::RequireViewDashboard;
use crate::response::DataResponse;
use crate::state::AppState;

/// Window for the "active dirigentes" figure, in minutes.
const ACTIVE_WINDOW_MINS: i32 = 60;

/// Maximum number of barrios returned by the coverage endpoint.
const TOP_BARRIOS: usize = 10;

/// Headline figures for the dashboard summary strip.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_voters: i64,
    pub vehicles_en_viaje: i64,
    pub active_dirigentes: i64,
}

/// GET /api/v1/dashboard/summary
pub async fn summary(
    RequireViewDashboard(user): RequireViewDashboard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let total_voters = VoterRepo::count_for_org(&state.pool, user.organization_id).await?;
    let vehicles_en_viaje =
        VehicleRepo::count_by_status(&state.pool, user.organization_id, VehicleStatus::EnViaje)
            .await?;
    let active_dirigentes =
        VoterRepo::active_dirigentes(&state.pool, user.organization_id, ACTIVE_WINDOW_MINS).await?;

    Ok(Json(DataResponse::new(DashboardSummary {
        total_voters,
        vehicles_en_viaje,
        active_dirigentes,
    })))
}

/// GET /api/v1/dashboard/voters-by-hour
///
/// Hour-of-day histogram of the trailing 24 hours, oldest bucket first.
pub async fn voters_by_hour_handler(
    RequireViewDashboard(user): RequireViewDashboard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<HourBucket>>>> {
    let now = Utc::now();
    let since = now - Duration::hours(24);
    let timestamps: Vec<String> =
        VoterRepo::timestamps_since(&state.pool, user.organization_id, since)
            .await?
            .iter()
            .map(|ts| ts.to_rfc3339())
            .collect();

    Ok(Json(DataResponse::new(voters_by_hour(&timestamps, now))))
}

/// GET /api/v1/dashboard/dirigente-performance
///
/// Dirigentes ranked by registrations, descending.
pub async fn dirigente_performance(
    RequireViewDashboard(user): RequireViewDashboard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DirigentePerformance>>>> {
    let records = VoterRepo::performance_rows(&state.pool, user.organization_id).await?;
    Ok(Json(DataResponse::new(rank_dirigentes(&records))))
}

/// GET /api/v1/dashboard/barrio-coverage
///
/// Registrations grouped by the registering dirigente's neighborhood,
/// limited to the ten busiest barrios.
pub async fn barrio_coverage_handler(
    RequireViewDashboard(user): RequireViewDashboard,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<BarrioCoverage>>>> {
    let barrios = VoterRepo::barrio_rows(&state.pool, user.organization_id).await?;
    let mut coverage = barrio_coverage(&barrios);
    coverage.truncate(TOP_BARRIOS);
    Ok(Json(DataResponse::new(coverage)))
}
