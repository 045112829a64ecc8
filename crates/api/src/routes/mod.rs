pub mod admin;
pub mod auth;
pub mod health;
pub mod showcase;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              WebSocket (live project list)
///
/// /showcase/projects                               cache state + list (public)
/// /showcase/projects/{id}                          single project (public)
/// /showcase/projects/{id}/delete                   delete prompt (requires auth)
///
/// /auth/login                                      login (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/session                                    gate state (public)
///
/// /admin/console                                   form + projects
/// /admin/console/form                              edit form fields (PUT)
/// /admin/console/reset                             back to create mode
/// /admin/console/edit/{id}                         load project into form
/// /admin/console/submit                            create or update
/// /admin/console/generate/description              generate description
/// /admin/console/generate/image                    generate image
/// /admin/console/upload                            attach image (multipart)
/// /admin/projects/{id}/delete                      delete prompt
/// /admin/deletions/{ticket}/confirm                confirm delete
/// /admin/deletions/{ticket}/cancel                 cancel delete
/// /admin/cache/resubscribe                         restart live subscription
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Public portfolio view.
        .nest("/showcase", showcase::router())
        // Authentication routes (login, logout, session).
        .nest("/auth", auth::router())
        // Admin console (all routes require auth).
        .nest("/admin", admin::router())
}
