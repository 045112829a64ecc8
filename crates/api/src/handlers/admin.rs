//! Handlers for the `/admin` resource: the project console.
//!
//! Every handler requires [`AdminUser`]. Commands that end in a message
//! return it as a `notice`; failures become [`AppError`]s carrying the
//! same fixed texts.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use folio_console::{ConsoleView, DeletePrompt, FormEdit, ProjectForm};
use folio_events::CacheView;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::response::{DataResponse, NoticeResponse};
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
const UPLOAD_FIELD: &str = "image";

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// The console page: form state plus the shared project list.
#[derive(Debug, Serialize)]
pub struct ConsolePage {
    pub console: ConsoleView,
    pub projects: CacheView,
}

/// Echo of the ticket a confirm or cancel acted on.
#[derive(Debug, Serialize)]
pub struct TicketRef {
    pub ticket: String,
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/console
pub async fn get_console(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Json<DataResponse<ConsolePage>> {
    Json(DataResponse {
        data: ConsolePage {
            console: state.console.view(),
            projects: state.cache.state().view(),
        },
    })
}

/// PUT /api/v1/admin/console/form
pub async fn edit_form(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(edit): Json<FormEdit>,
) -> Json<DataResponse<ProjectForm>> {
    Json(DataResponse {
        data: state.console.edit_form(edit),
    })
}

/// POST /api/v1/admin/console/reset
pub async fn reset_form(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Json<DataResponse<ProjectForm>> {
    Json(DataResponse {
        data: state.console.reset(),
    })
}

/// POST /api/v1/admin/console/edit/{id}
pub async fn select_for_edit(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ProjectForm>>> {
    let form = state.console.select_for_edit(&id)?;
    Ok(Json(DataResponse { data: form }))
}

/// POST /api/v1/admin/console/submit
///
/// Create or update depending on the form's mode. The returned form is
/// cleared on success.
pub async fn submit(
    admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<NoticeResponse<ProjectForm>>> {
    let notice = state.console.submit().await?;
    tracing::info!(uid = %admin.uid, message = %notice.message, "Console submit");
    Ok(Json(NoticeResponse::new(state.console.form(), notice)))
}

/// POST /api/v1/admin/console/generate/description
pub async fn generate_description(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<NoticeResponse<ProjectForm>>> {
    let notice = state.console.generate_description().await?;
    Ok(Json(NoticeResponse::new(state.console.form(), notice)))
}

/// POST /api/v1/admin/console/generate/image
pub async fn generate_image(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<NoticeResponse<ProjectForm>>> {
    let notice = state.console.generate_image().await?;
    Ok(Json(NoticeResponse::new(state.console.form(), notice)))
}

/// POST /api/v1/admin/console/upload
///
/// Multipart body with a single `image` file field.
pub async fn upload(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<NoticeResponse<ProjectForm>>> {
    let mut bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            bytes = Some(data);
            break;
        }
    }
    let bytes = bytes
        .ok_or_else(|| AppError::BadRequest(format!("Missing '{UPLOAD_FIELD}' file field")))?;

    let notice = state.console.upload(&bytes)?;
    Ok(Json(NoticeResponse::new(state.console.form(), notice)))
}

// ---------------------------------------------------------------------------
// Two-phase delete
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/projects/{id}/delete
pub async fn request_delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DataResponse<DeletePrompt>> {
    Json(DataResponse {
        data: state.console.request_delete(&id),
    })
}

/// POST /api/v1/admin/deletions/{ticket}/confirm
pub async fn confirm_delete(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(ticket): Path<String>,
) -> AppResult<Json<NoticeResponse<TicketRef>>> {
    let notice = state.console.confirm_delete(&ticket).await?;
    tracing::info!(uid = %admin.uid, %ticket, message = %notice.message, "Delete confirmed");
    Ok(Json(NoticeResponse::new(TicketRef { ticket }, notice)))
}

/// POST /api/v1/admin/deletions/{ticket}/cancel
pub async fn cancel_delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(ticket): Path<String>,
) -> Json<NoticeResponse<TicketRef>> {
    let notice = state.console.cancel_delete(&ticket);
    Json(NoticeResponse::new(TicketRef { ticket }, notice))
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/cache/resubscribe
///
/// Restart the live subscription. The cache goes back to `subscribing`.
pub async fn resubscribe(
    admin: AdminUser,
    State(state): State<AppState>,
) -> Json<DataResponse<CacheView>> {
    tracing::info!(uid = %admin.uid, "Re-subscribing project cache");
    state.cache.resubscribe(&state.repo);
    Json(DataResponse {
        data: state.cache.state().view(),
    })
}
