//! HTTP-level tests for the admin console: form, submit, generation,
//! upload, two-phase delete and re-subscribe.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_auth, login, png, post_auth, post_file_auth, put_json_auth, wait_for_projects,
    wait_until, TestApp,
};
use folio_core::media::MAX_UPLOAD_BYTES;
use folio_core::notice;
use folio_core::project::ProjectFields;
use folio_store::StoreError;
use serde_json::json;

async fn signed_in() -> (TestApp, String) {
    let test = common::build_test_app().await;
    let token = login(test.app()).await;
    (test, token)
}

async fn fill(test: &TestApp, token: &str, form: serde_json::Value) -> serde_json::Value {
    let response = put_json_auth(test.app(), "/api/v1/admin/console/form", form, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn seed(test: &TestApp, title: &str) -> String {
    let before = test.state.cache.projects().map_or(0, |p| p.len());
    let id = test
        .state
        .repo
        .create(&ProjectFields::new(title, "Seeded"))
        .await
        .unwrap();
    wait_for_projects(&test.state, before + 1).await;
    id
}

// ---------------------------------------------------------------------------
// Console page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn console_starts_in_create_mode() {
    let (test, token) = signed_in().await;
    seed(&test, "Existing").await;

    let json = body_json(get_auth(test.app(), "/api/v1/admin/console", &token).await).await;
    assert_eq!(json["data"]["console"]["mode"], "create");
    assert_eq!(json["data"]["console"]["form"]["title"], "");
    assert_eq!(json["data"]["console"]["generating_description"], false);
    assert_eq!(json["data"]["projects"]["status"], "ready");
    assert_eq!(json["data"]["projects"]["projects"][0]["title"], "Existing");
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_submit_is_refused_without_a_write() {
    let (test, token) = signed_in().await;
    fill(&test, &token, json!({ "title": "   ", "description": "Something" })).await;

    let response = post_auth(test.app(), "/api/v1/admin/console/submit", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], notice::REQUIRED_FIELDS);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(test.store.write_attempts(), 0);
}

#[tokio::test]
async fn submit_creates_and_clears_form() {
    let (test, token) = signed_in().await;
    fill(
        &test,
        &token,
        json!({ "title": "Sales Dashboard", "description": "KPIs", "keywords": "SQL" }),
    )
    .await;

    let response = post_auth(test.app(), "/api/v1/admin/console/submit", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["notice"]["level"], "info");
    assert_eq!(json["notice"]["message"], notice::PROJECT_ADDED);
    assert_eq!(json["data"]["title"], "");
    assert_eq!(json["data"]["keywords"], "");

    wait_for_projects(&test.state, 1).await;
    let projects = test.state.cache.projects().unwrap();
    assert_eq!(projects[0].title, "Sales Dashboard");
    assert!(projects[0].created_at.is_some());
}

#[tokio::test]
async fn edit_then_submit_updates_in_place() {
    let (test, token) = signed_in().await;
    let id = seed(&test, "Old title").await;

    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/console/edit/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "Old title");

    fill(&test, &token, json!({ "title": "New title" })).await;
    let response = post_auth(test.app(), "/api/v1/admin/console/submit", &token).await;
    assert_eq!(body_json(response).await["notice"]["message"], notice::PROJECT_UPDATED);

    wait_until(|| {
        test.state
            .cache
            .find(&id)
            .is_some_and(|p| p.title == "New title")
    })
    .await;
    assert_eq!(test.state.cache.projects().unwrap().len(), 1);
}

#[tokio::test]
async fn rejected_write_keeps_the_form() {
    let (test, token) = signed_in().await;
    test.store.refuse_writes(Some("rules"));
    fill(&test, &token, json!({ "title": "Kept", "description": "As typed" })).await;

    let response = post_auth(test.app(), "/api/v1/admin/console/submit", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["error"], notice::PROJECT_SAVE_FAILED);
    assert_eq!(json["code"], "WRITE_REJECTED");
    assert_eq!(test.state.console.form().title, "Kept");
}

#[tokio::test]
async fn edit_unknown_project_is_404() {
    let (test, token) = signed_in().await;
    let response = post_auth(test.app(), "/api/v1/admin/console/edit/missing", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_returns_to_create_mode() {
    let (test, token) = signed_in().await;
    let id = seed(&test, "Selected").await;
    post_auth(test.app(), &format!("/api/v1/admin/console/edit/{id}"), &token).await;

    let response = post_auth(test.app(), "/api/v1/admin/console/reset", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(get_auth(test.app(), "/api/v1/admin/console", &token).await).await;
    assert_eq!(json["data"]["console"]["mode"], "create");
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generation_without_title_never_calls_the_service() {
    let (test, token) = signed_in().await;

    let response = post_auth(
        test.app(),
        "/api/v1/admin/console/generate/description",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        notice::TITLE_REQUIRED_FOR_DESCRIPTION
    );

    let response = post_auth(test.app(), "/api/v1/admin/console/generate/image", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], notice::TITLE_REQUIRED_FOR_IMAGE);

    assert_eq!(test.generator.calls(), 0);
}

#[tokio::test]
async fn generated_description_fills_the_form() {
    let (test, token) = signed_in().await;
    test.generator.set_text(Some("A crisp summary."));
    fill(&test, &token, json!({ "title": "Churn model", "keywords": "Python" })).await;

    let response = post_auth(
        test.app(),
        "/api/v1/admin/console/generate/description",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["description"], "A crisp summary.");
    assert_eq!(json["notice"]["message"], notice::DESCRIPTION_GENERATED);
    assert_eq!(test.generator.calls(), 1);
}

#[tokio::test]
async fn generated_image_is_a_data_uri() {
    let (test, token) = signed_in().await;
    test.generator.set_image(Some("aGVsbG8="));
    fill(&test, &token, json!({ "title": "Churn model" })).await;

    let response = post_auth(test.app(), "/api/v1/admin/console/generate/image", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["image"], "data:image/png;base64,aGVsbG8=");
}

#[tokio::test]
async fn failed_image_generation_leaves_image_cleared() {
    let (test, token) = signed_in().await;
    fill(
        &test,
        &token,
        json!({ "title": "Churn model", "image": "https://img/old.png" }),
    )
    .await;

    let response = post_auth(test.app(), "/api/v1/admin/console/generate/image", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GENERATION_FAILED");
    assert_eq!(json["error"], notice::IMAGE_GENERATION_FAILED);
    assert!(test.state.console.form().image.is_none());
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_attaches_image() {
    let (test, token) = signed_in().await;
    let response = post_file_auth(
        test.app(),
        "/api/v1/admin/console/upload",
        "image",
        &png(2048),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["image"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert_eq!(json["notice"]["message"], notice::IMAGE_ATTACHED);
}

#[tokio::test]
async fn oversized_upload_is_rejected_and_clears_image() {
    let (test, token) = signed_in().await;
    fill(&test, &token, json!({ "image": "https://img/old.png" })).await;

    let response = post_file_auth(
        test.app(),
        "/api/v1/admin/console/upload",
        "image",
        &png(MAX_UPLOAD_BYTES + 1),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], notice::IMAGE_TOO_LARGE);
    assert!(test.state.console.form().image.is_none());
}

#[tokio::test]
async fn upload_without_image_field_is_400() {
    let (test, token) = signed_in().await;
    let response = post_file_auth(
        test.app(),
        "/api/v1/admin/console/upload",
        "attachment",
        &png(64),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Two-phase delete
// ---------------------------------------------------------------------------

async fn request_delete(test: &TestApp, token: &str, id: &str) -> String {
    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/projects/{id}/delete"),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["ticket"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn delete_happens_only_after_confirm() {
    let (test, token) = signed_in().await;
    let id = seed(&test, "Doomed").await;
    let writes = test.store.write_attempts();

    let ticket = request_delete(&test, &token, &id).await;
    assert_eq!(test.store.write_attempts(), writes);

    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/deletions/{ticket}/confirm"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["notice"]["message"], notice::PROJECT_DELETED);
    wait_for_projects(&test.state, 0).await;

    // A second confirm of the same ticket deletes nothing.
    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/deletions/{ticket}/confirm"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["notice"]["message"],
        notice::NOTHING_TO_CONFIRM
    );
    assert_eq!(test.store.write_attempts(), writes + 1);
}

#[tokio::test]
async fn cancel_leaves_project_in_place() {
    let (test, token) = signed_in().await;
    let id = seed(&test, "Spared").await;
    let ticket = request_delete(&test, &token, &id).await;

    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/deletions/{ticket}/cancel"),
        &token,
    )
    .await;
    assert_eq!(
        body_json(response).await["notice"]["message"],
        notice::DELETE_CANCELLED
    );
    assert_eq!(test.state.console.pending_deletes(), 0);
    assert!(test.state.cache.find(&id).is_some());
}

#[tokio::test]
async fn rejected_delete_reports_failure() {
    let (test, token) = signed_in().await;
    let id = seed(&test, "Protected").await;
    let ticket = request_delete(&test, &token, &id).await;
    test.store.refuse_writes(Some("rules"));

    let response = post_auth(
        test.app(),
        &format!("/api/v1/admin/deletions/{ticket}/confirm"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["error"], notice::PROJECT_DELETE_FAILED);
    assert!(test.state.cache.find(&id).is_some());
}

// ---------------------------------------------------------------------------
// Re-subscribe
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resubscribe_recovers_a_failed_cache() {
    let (test, token) = signed_in().await;
    seed(&test, "Survivor").await;
    test.store.break_subscriptions(
        test.state.repo.path(),
        StoreError::Unavailable("blip".into()),
    );
    wait_until(|| test.state.cache.state().is_failed()).await;

    let response = post_auth(test.app(), "/api/v1/admin/cache/resubscribe", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    wait_for_projects(&test.state, 1).await;
    assert!(test.state.cache.state().is_ready());
}
