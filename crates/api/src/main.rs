use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use folio_genai::{ContentGenerator, GeminiClient};
use folio_store::firestore::FirestoreStore;
use folio_store::memory::MemoryStore;
use folio_store::DocumentStore;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::auth::firebase::FirebaseAuthService;
use folio_api::auth::local::LocalAuthService;
use folio_api::auth::password::hash_password;
use folio_api::auth::relay::start_credential_relay;
use folio_api::auth::service::AuthService;
use folio_api::config::{AuthBackend, ServerConfig, StoreBackend};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_api::ws;

#[tokio::main]
async fn main() {
    // `folio-api hash-password <password>` prints an ADMIN_PASSWORD_HASH value.
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let password = args.get(2).expect("usage: folio-api hash-password <password>");
        println!("{}", hash_password(password).expect("Failed to hash password"));
        return;
    }

    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "folio_api=debug,folio_store=debug,folio_events=debug,folio_console=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        app_id = %config.app_id,
        store = config.store_backend_name(),
        "Loaded server configuration"
    );

    // --- Document store ---
    let store: Arc<dyn DocumentStore> = match &config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; projects are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Firestore(fs) => {
            tracing::info!(project_id = %fs.project_id, "Using Firestore document store");
            Arc::new(FirestoreStore::new(fs.clone()))
        }
    };

    // --- Auth service ---
    let auth: Arc<dyn AuthService> = match &config.auth {
        AuthBackend::Local {
            email,
            password_hash,
        } => Arc::new(LocalAuthService::new(email.clone(), password_hash.clone())),
        AuthBackend::Firebase { api_key } => Arc::new(FirebaseAuthService::new(api_key.clone())),
    };
    tracing::info!(backend = auth.backend_name(), "Auth service configured");

    // --- Generative service ---
    if config.genai.api_key.is_empty() {
        tracing::warn!("GENAI_API_KEY is empty; generation requests will be rejected");
    }
    let generator: Arc<dyn ContentGenerator> = Arc::new(GeminiClient::new(config.genai.clone()));

    // --- App state ---
    let state = AppState::new(config.clone(), Arc::clone(&store), generator, auth);

    // --- Background tasks ---
    let cancel = CancellationToken::new();
    let relay_handle = start_credential_relay(&state.gate, Arc::clone(&store), cancel.clone());
    let push_handle =
        ws::start_cache_push(&state.cache, Arc::clone(&state.ws_manager), cancel.clone());
    let heartbeat_handle = ws::start_heartbeat(
        Arc::clone(&state.ws_manager),
        ws::HEARTBEAT_INTERVAL,
        cancel.clone(),
    );

    // --- Live project cache ---
    state.cache.mount(&state.repo);
    tracing::info!(path = %state.repo.path(), "Project cache mounted");

    let cache = Arc::clone(&state.cache);
    let ws_manager = Arc::clone(&state.ws_manager);

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cache.unmount();
    tracing::info!("Project cache unmounted");

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), relay_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), push_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), heartbeat_handle).await;
    tracing::info!("Background tasks stopped");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
