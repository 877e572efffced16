//! Route definitions, one module per resource.

pub mod assistant;
pub mod auth;
pub mod dashboard;
pub mod dirigentes;
pub mod health;
pub mod vehicles;
pub mod voters;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket feed (token query param)
///
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /dashboard/summary                   headline figures
/// /dashboard/voters-by-hour            24h histogram
/// /dashboard/dirigente-performance     ranking
/// /dashboard/barrio-coverage           neighborhood totals
///
/// /voters                              create, list
///
/// /vehicles                            list, create
/// /vehicles/{id}                       update, delete
/// /vehicles/{id}/status                status change
/// /vehicles/import                     JSON bulk import
/// /vehicles/import/file                spreadsheet bulk import
/// /vehicles/import/template            example workbook download
///
/// /dirigentes                          list, create
/// /dirigentes/{id}                     update, delete
///
/// /assistant/ask                       electoral assistant
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/voters", voters::router())
        .nest("/vehicles", vehicles::router())
        .nest("/dirigentes", dirigentes::router())
        .nest("/assistant", assistant::router())
}
