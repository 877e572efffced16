//! Route definitions for the `/vehicles` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::vehicles;
use crate::import::xlsx::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Routes mounted at `/vehicles`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// PATCH  /{id}/status       -> status change (admin or assigned dirigente)
/// POST   /import            -> JSON bulk import
/// POST   /import/file       -> spreadsheet bulk import
/// GET    /import/template   -> example workbook download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(vehicles::list).post(vehicles::create))
        .route("/{id}", put(vehicles::update).delete(vehicles::delete))
        .route("/{id}/status", patch(vehicles::update_status))
        .route("/import", post(vehicles::import))
        .route(
            "/import/file",
            // Above MAX_UPLOAD_BYTES (plus multipart framing headroom) so the
            // handler's own size check produces the oversize rejection.
            post(vehicles::import_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024)),
        )
        .route("/import/template", get(vehicles::import_template))
}
