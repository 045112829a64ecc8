#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use folio_api::auth::jwt::JwtConfig;
use folio_api::auth::local::LocalAuthService;
use folio_api::auth::password::hash_password;
use folio_api::config::{AuthBackend, ServerConfig, StoreBackend};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_genai::{ContentGenerator, GenerationError, GeminiConfig};
use folio_store::memory::MemoryStore;

pub const ADMIN_EMAIL: &str = "admin@folio.test";
pub const ADMIN_PASSWORD: &str = "test_password_123!";

// ---------------------------------------------------------------------------
// Generator stub
// ---------------------------------------------------------------------------

/// Answers with whatever the test configured, counting calls.
///
/// `None` replies model a service that answered without the expected field.
#[derive(Default)]
pub struct StubGenerator {
    calls: AtomicUsize,
    text: Mutex<Option<String>>,
    image: Mutex<Option<String>>,
}

impl StubGenerator {
    pub fn set_text(&self, text: Option<&str>) {
        *self.text.lock().unwrap() = text.map(str::to_string);
    }

    pub fn set_image(&self, image: Option<&str>) {
        *self.image.lock().unwrap() = image.map(str::to_string);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate_text(&self, _prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text
            .lock()
            .unwrap()
            .clone()
            .ok_or(GenerationError::UnexpectedShape("candidates"))
    }

    async fn generate_image(&self, _prompt: &str, _n: u32) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.image
            .lock()
            .unwrap()
            .clone()
            .ok_or(GenerationError::UnexpectedShape("predictions"))
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// A running app over the in-memory store, local auth and a stub generator.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub generator: Arc<StubGenerator>,
}

impl TestApp {
    /// A fresh handle to the router for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_id: "folio-test".to_string(),
        store: StoreBackend::Memory,
        auth: AuthBackend::Local {
            email: ADMIN_EMAIL.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).expect("hashing should succeed"),
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 60,
        },
        genai: GeminiConfig::default(),
    }
}

/// Build the full application router with all middleware layers and mount
/// the project cache, returning once the first snapshot has arrived.
pub async fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let generator = Arc::new(StubGenerator::default());

    let AuthBackend::Local {
        email,
        password_hash,
    } = &config.auth
    else {
        unreachable!("test config uses local auth");
    };
    let auth = Arc::new(LocalAuthService::new(email.clone(), password_hash.clone()));

    let state = AppState::new(config.clone(), store.clone(), generator.clone(), auth);
    state.cache.mount(&state.repo);
    wait_until(|| state.cache.state().is_ready()).await;

    let router = build_app_router(state.clone(), &config);
    TestApp {
        router,
        state,
        store,
        generator,
    }
}

/// Poll `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Wait until the cache holds exactly `n` projects.
pub async fn wait_for_projects(state: &AppState, n: usize) {
    wait_until(|| state.cache.projects().is_some_and(|p| p.len() == n)).await;
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST with no body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a multipart body with one file field.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    field: &str,
    bytes: &[u8],
    token: &str,
) -> Response {
    let boundary = "folio-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Sign in as the test admin and return the session token.
pub async fn login(app: Router) -> String {
    let body = serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Smallest byte string the upload sniffer accepts as PNG, padded to `len`.
pub fn png(len: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.resize(len.max(bytes.len()), 0);
    bytes
}
