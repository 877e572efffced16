//! Route definitions for the `/voters` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::voters;
use crate::state::AppState;

/// Routes mounted at `/voters`.
///
/// ```text
/// GET  /   -> list (own or org-wide, by capability)
/// POST /   -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(voters::list).post(voters::create))
}
