//! Route definitions for the `/assistant` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::assistant;
use crate::state::AppState;

/// Routes mounted at `/assistant`. Requires assistant access.
pub fn router() -> Router<AppState> {
    Router::new().route("/ask", post(assistant::ask))
}
