//! Route definitions for the `/dirigentes` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::dirigentes;
use crate::state::AppState;

/// Routes mounted at `/dirigentes`. All require staff management.
///
/// ```text
/// GET    /       -> list (with assigned-vehicle counts)
/// POST   /       -> create (auth identity + profile)
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete (refused while vehicles remain assigned)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dirigentes::list).post(dirigentes::create))
        .route("/{id}", put(dirigentes::update).delete(dirigentes::delete))
}
