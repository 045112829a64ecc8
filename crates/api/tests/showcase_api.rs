//! HTTP-level tests for the public showcase: listing, single reads, and
//! the login-gated delete prompt.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, login, post_auth, post_empty, wait_for_projects, wait_until};
use folio_core::notice;
use folio_core::project::ProjectFields;
use folio_store::StoreError;

async fn seed(test: &common::TestApp, titles: &[&str]) -> Vec<String> {
    let mut ids = Vec::new();
    for title in titles {
        let id = test
            .state
            .repo
            .create(&ProjectFields::new(*title, format!("About {title}")))
            .await
            .unwrap();
        ids.push(id);
        // Distinct creation times keep the ordering deterministic.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    wait_for_projects(&test.state, titles.len()).await;
    ids
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_collection_is_ready_and_empty() {
    let test = common::build_test_app().await;
    let json = body_json(get(test.app(), "/api/v1/showcase/projects").await).await;

    assert_eq!(json["data"]["status"], "ready");
    assert_eq!(json["data"]["projects"], serde_json::json!([]));
    assert!(json["data"].get("error").is_none());
}

#[tokio::test]
async fn list_is_most_recent_first() {
    let test = common::build_test_app().await;
    seed(&test, &["First", "Second", "Third"]).await;

    let json = body_json(get(test.app(), "/api/v1/showcase/projects").await).await;
    let titles: Vec<&str> = json["data"]["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Third", "Second", "First"]);
}

#[tokio::test]
async fn failed_cache_reports_error_without_projects() {
    let test = common::build_test_app().await;
    seed(&test, &["Kept"]).await;

    test.store.break_subscriptions(
        test.state.repo.path(),
        StoreError::PermissionDenied("rules".into()),
    );
    wait_until(|| test.state.cache.state().is_failed()).await;

    let response = get(test.app(), "/api/v1/showcase/projects").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "failed");
    assert_eq!(json["data"]["error"], notice::FETCH_FAILED);
    assert!(json["data"].get("projects").is_none());
}

// ---------------------------------------------------------------------------
// Single project
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_single_project() {
    let test = common::build_test_app().await;
    let ids = seed(&test, &["Dashboard"]).await;

    let response = get(test.app(), &format!("/api/v1/showcase/projects/{}", ids[0])).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], ids[0]);
    assert_eq!(json["data"]["title"], "Dashboard");
    assert!(json["data"].get("image").is_none());
}

#[tokio::test]
async fn unknown_project_is_404() {
    let test = common::build_test_app().await;
    let response = get(test.app(), "/api/v1/showcase/projects/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn single_read_on_failed_cache_is_503() {
    let test = common::build_test_app().await;
    let ids = seed(&test, &["Gone"]).await;
    test.store.break_subscriptions(
        test.state.repo.path(),
        StoreError::Unavailable("offline".into()),
    );
    wait_until(|| test.state.cache.state().is_failed()).await;

    let response = get(test.app(), &format!("/api/v1/showcase/projects/{}", ids[0])).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FETCH_FAILED");
    assert_eq!(json["error"], notice::FETCH_FAILED);
}

// ---------------------------------------------------------------------------
// Delete prompt
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_delete_requires_login() {
    let test = common::build_test_app().await;
    let ids = seed(&test, &["Keep me"]).await;

    let response = post_empty(
        test.app(),
        &format!("/api/v1/showcase/projects/{}/delete", ids[0]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], notice::DELETE_REQUIRES_LOGIN);
    assert_eq!(test.state.console.pending_deletes(), 0);
}

#[tokio::test]
async fn signed_in_delete_only_prompts() {
    let test = common::build_test_app().await;
    let ids = seed(&test, &["Keep me"]).await;
    let token = login(test.app()).await;
    let writes_before = test.store.write_attempts();

    let response = post_auth(
        test.app(),
        &format!("/api/v1/showcase/projects/{}/delete", ids[0]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["ticket"].is_string());
    assert_eq!(json["data"]["project_id"], ids[0]);
    assert_eq!(json["data"]["notice"]["level"], "confirm");
    assert_eq!(json["data"]["notice"]["message"], notice::PROJECT_DELETE_CONFIRM);

    // Nothing is written until the prompt is confirmed.
    assert_eq!(test.store.write_attempts(), writes_before);
    assert_eq!(test.state.cache.projects().unwrap().len(), 1);
}
