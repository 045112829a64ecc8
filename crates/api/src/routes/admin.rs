//! Route definitions for the `/admin` console.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Upload request body cap. Files over the 100KB attachment limit must
/// still reach the handler so the rejection clears the form image.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Routes mounted at `/admin`. All require auth.
///
/// ```text
/// GET  /console                         -> get_console
/// PUT  /console/form                    -> edit_form
/// POST /console/reset                   -> reset_form
/// POST /console/edit/{id}               -> select_for_edit
/// POST /console/submit                  -> submit
/// POST /console/generate/description    -> generate_description
/// POST /console/generate/image          -> generate_image
/// POST /console/upload                  -> upload
/// POST /projects/{id}/delete            -> request_delete
/// POST /deletions/{ticket}/confirm      -> confirm_delete
/// POST /deletions/{ticket}/cancel       -> cancel_delete
/// POST /cache/resubscribe               -> resubscribe
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/console", get(admin::get_console))
        .route("/console/form", put(admin::edit_form))
        .route("/console/reset", post(admin::reset_form))
        .route("/console/edit/{id}", post(admin::select_for_edit))
        .route("/console/submit", post(admin::submit))
        .route(
            "/console/generate/description",
            post(admin::generate_description),
        )
        .route("/console/generate/image", post(admin::generate_image))
        .route(
            "/console/upload",
            post(admin::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/projects/{id}/delete", post(admin::request_delete))
        .route("/deletions/{ticket}/confirm", post(admin::confirm_delete))
        .route("/deletions/{ticket}/cancel", post(admin::cancel_delete))
        .route("/cache/resubscribe", post(admin::resubscribe))
}
