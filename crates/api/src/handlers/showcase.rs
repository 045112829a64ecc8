//! Handlers for the public `/showcase` resource.
//!
//! Reads come straight from the live project cache and never contact the
//! store. The one write path, the delete prompt, needs a signed-in caller.

use axum::extract::{Path, State};
use axum::Json;
use folio_console::DeletePrompt;
use folio_core::error::CoreError;
use folio_core::notice;
use folio_core::project::{self, Project};
use folio_events::CacheView;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/showcase/projects
///
/// The cache state with the list when ready. A failed cache is still a
/// 200: the front end renders the error text from the payload.
pub async fn list_projects(State(state): State<AppState>) -> Json<DataResponse<CacheView>> {
    Json(DataResponse {
        data: state.cache.state().view(),
    })
}

/// GET /api/v1/showcase/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Project>>> {
    if let Some(project) = state.cache.find(&id) {
        return Ok(Json(DataResponse { data: project }));
    }
    if state.cache.state().is_failed() {
        return Err(AppError::FetchFailed);
    }
    Err(AppError::Core(CoreError::NotFound {
        entity: project::ENTITY,
        id,
    }))
}

/// POST /api/v1/showcase/projects/{id}/delete
///
/// First phase of a delete from the public view. Anonymous callers get the
/// login-required message and nothing is queued.
pub async fn request_delete(
    admin: Result<AdminUser, AppError>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<DeletePrompt>>> {
    let admin = admin.map_err(|_| {
        AppError::Core(CoreError::Unauthorized(notice::DELETE_REQUIRES_LOGIN.into()))
    })?;
    tracing::debug!(uid = %admin.uid, project_id = %id, "Showcase delete requested");

    Ok(Json(DataResponse {
        data: state.console.request_delete(&id),
    }))
}
