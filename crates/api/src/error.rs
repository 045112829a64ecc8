use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_console::ConsoleError;
use folio_core::auth::SignInFailure;
use folio_core::error::CoreError;
use folio_core::notice;
use serde_json::json;

use crate::auth::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent `{"error", "code"}` JSON bodies
/// where `error` is always one of the fixed user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `folio_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A console command that did not go through.
    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The live project list is in the failed state.
    #[error("Project list unavailable")]
    FetchFailed,

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.user_message())
                }
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Console commands ---
            AppError::Console(err) => {
                let (status, code) = match err {
                    ConsoleError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    ConsoleError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    ConsoleError::SaveFailed(_) | ConsoleError::DeleteFailed(_) => {
                        (StatusCode::BAD_GATEWAY, "WRITE_REJECTED")
                    }
                    ConsoleError::Generation { .. } => {
                        (StatusCode::BAD_GATEWAY, "GENERATION_FAILED")
                    }
                };
                (status, code, err.user_message())
            }

            // --- Auth ---
            AppError::Auth(err) => match err {
                AuthError::SignIn(SignInFailure::MissingCredentials) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    err.user_message().to_string(),
                ),
                AuthError::SignIn(_) => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    err.user_message().to_string(),
                ),
                AuthError::SignOut(_) => (
                    StatusCode::BAD_GATEWAY,
                    "LOGOUT_FAILED",
                    err.user_message().to_string(),
                ),
            },

            AppError::FetchFailed => (
                StatusCode::SERVICE_UNAVAILABLE,
                "FETCH_FAILED",
                notice::FETCH_FAILED.to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
