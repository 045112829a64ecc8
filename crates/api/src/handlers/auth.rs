//! Handlers for the `/auth` resource (login, logout, session).

use axum::extract::State;
use axum::Json;
use folio_core::notice::{self, Notice};
use serde::{Deserialize, Serialize};

use crate::auth::gate::GateState;
use crate::auth::jwt::generate_session_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
///
/// Missing fields deserialize as empty and are refused by the gate.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Successful sign-in response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub uid: String,
    pub email: String,
}

/// Sign-out result. A refused sign-out still answers 200 with the gate
/// state unchanged and an error notice.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub data: GateState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Sign in at the auth gate and return a token for admin calls. The token
/// is bound to the session this sign-in opened.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let session = state.gate.sign_in(&input.email, &input.password).await?;

    let access_token = generate_session_token(&session, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(LoginResponse {
        access_token,
        expires_in: state.config.jwt.expires_in(),
        user: UserInfo {
            uid: session.identity.uid,
            email: session.identity.email,
        },
    }))
}

/// POST /api/v1/auth/logout
pub async fn logout(_admin: AdminUser, State(state): State<AppState>) -> Json<LogoutResponse> {
    let notice = match state.gate.sign_out().await {
        Ok(()) => None,
        Err(_) => Some(Notice::error(notice::LOGOUT_FAILED)),
    };
    Json(LogoutResponse {
        data: state.gate.state(),
        notice,
    })
}

/// GET /api/v1/auth/session
///
/// Whether anyone is signed in. Decides between login form and console.
pub async fn session(State(state): State<AppState>) -> Json<DataResponse<GateState>> {
    Json(DataResponse {
        data: state.gate.state(),
    })
}
