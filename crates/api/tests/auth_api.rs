//! HTTP-level integration tests for sign-in, sign-out, and the admin gate.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, login, post_auth, post_json, ADMIN_EMAIL, ADMIN_PASSWORD};
use folio_api::auth::local::MAX_FAILED_ATTEMPTS;
use folio_core::notice;
use serde_json::json;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with a session token and the identity.
#[tokio::test]
async fn login_success() {
    let test = common::build_test_app().await;
    let body = json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(test.app(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["email"], ADMIN_EMAIL);
    assert!(test.state.gate.is_signed_in());
}

/// Empty fields are refused before the auth service is asked.
#[tokio::test]
async fn login_with_missing_fields_is_400() {
    let test = common::build_test_app().await;

    let body = json!({ "email": ADMIN_EMAIL });
    let response = post_json(test.app(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], notice::MISSING_CREDENTIALS);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

/// Wrong password and unknown email read the same to the caller.
#[tokio::test]
async fn bad_credentials_are_401_with_fixed_message() {
    let test = common::build_test_app().await;

    let wrong_pw = json!({ "email": ADMIN_EMAIL, "password": "incorrect_password" });
    let response = post_json(test.app(), "/api/v1/auth/login", wrong_pw).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let first = body_json(response).await;

    let unknown = json!({ "email": "nobody@folio.test", "password": ADMIN_PASSWORD });
    let response = post_json(test.app(), "/api/v1/auth/login", unknown).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let second = body_json(response).await;

    assert_eq!(first["error"], notice::INVALID_CREDENTIALS);
    assert_eq!(first["error"], second["error"]);
    assert!(!test.state.gate.is_signed_in());
}

/// Repeated failures lock the account; the lock reads as rate limiting.
#[tokio::test]
async fn account_locks_after_repeated_failures() {
    let test = common::build_test_app().await;
    let wrong = json!({ "email": ADMIN_EMAIL, "password": "wrong" });
    for _ in 0..MAX_FAILED_ATTEMPTS {
        let response = post_json(test.app(), "/api/v1/auth/login", wrong.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let right = json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(test.app(), "/api/v1/auth/login", right).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], notice::TOO_MANY_ATTEMPTS);
}

// ---------------------------------------------------------------------------
// Session and logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_reflects_gate_state() {
    let test = common::build_test_app().await;

    let json = body_json(get(test.app(), "/api/v1/auth/session").await).await;
    assert_eq!(json["data"]["signed_in"], false);
    assert!(json["data"].get("email").is_none());

    login(test.app()).await;
    let json = body_json(get(test.app(), "/api/v1/auth/session").await).await;
    assert_eq!(json["data"]["signed_in"], true);
    assert_eq!(json["data"]["email"], ADMIN_EMAIL);
}

/// Logging out ends the session for every token issued in it.
#[tokio::test]
async fn logout_invalidates_token() {
    let test = common::build_test_app().await;
    let token = login(test.app()).await;

    let response = get_auth(test.app(), "/api/v1/admin/console", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_auth(test.app(), "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["signed_in"], false);
    assert!(json.get("notice").is_none());

    let response = get_auth(test.app(), "/api/v1/admin/console", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A token from an ended session stays dead after the same account signs
/// in again; only the new token works.
#[tokio::test]
async fn old_token_stays_invalid_after_relogin() {
    let test = common::build_test_app().await;
    let old_token = login(test.app()).await;

    let response = post_auth(test.app(), "/api/v1/auth/logout", &old_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let new_token = login(test.app()).await;
    assert_ne!(new_token, old_token);

    let response = get_auth(test.app(), "/api/v1/admin/console", &old_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(test.app(), "/api/v1/admin/console", &new_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Signing in again without logging out replaces the open session.
#[tokio::test]
async fn relogin_replaces_previous_session() {
    let test = common::build_test_app().await;
    let first = login(test.app()).await;
    let second = login(test.app()).await;

    let response = get_auth(test.app(), "/api/v1/admin/console", &first).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(test.app(), "/api/v1/admin/console", &second).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Admin gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_routes_require_token() {
    let test = common::build_test_app().await;

    let response = get(test.app(), "/api/v1/admin/console").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get_auth(test.app(), "/api/v1/admin/console", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_requires_token() {
    let test = common::build_test_app().await;
    let response = common::post_empty(test.app(), "/api/v1/auth/logout").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
