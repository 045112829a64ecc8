//! Route definitions for the public `/showcase` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::showcase;
use crate::state::AppState;

/// Routes mounted at `/showcase`.
///
/// ```text
/// GET  /projects              -> list_projects
/// GET  /projects/{id}         -> get_project
/// POST /projects/{id}/delete  -> request_delete (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(showcase::list_projects))
        .route("/projects/{id}", get(showcase::get_project))
        .route("/projects/{id}/delete", post(showcase::request_delete))
}
