use std::sync::Arc;

use folio_console::Console;
use folio_events::LiveProjectCache;
use folio_genai::ContentGenerator;
use folio_store::{CollectionPath, DocumentStore, ProjectRepository};

use crate::auth::gate::AuthGate;
use crate::auth::service::AuthService;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Repository pinned to `artifacts/{app_id}/public/data/projects`.
    pub repo: ProjectRepository,
    /// The one live project list shared by the showcase and the console.
    pub cache: Arc<LiveProjectCache>,
    /// Admin command handler.
    pub console: Arc<Console>,
    pub gate: Arc<AuthGate>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
}

impl AppState {
    /// Wire the components together. The cache is created unmounted; the
    /// caller decides when to [`mount`](LiveProjectCache::mount) it.
    ///
    /// # Panics
    ///
    /// Panics if `config.app_id` cannot form a collection path.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn ContentGenerator>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        let path = CollectionPath::projects(&config.app_id)
            .expect("APP_ID must be a valid path segment");
        let repo = ProjectRepository::new(store, path);
        let cache = Arc::new(LiveProjectCache::new());
        let console = Arc::new(Console::new(repo.clone(), Arc::clone(&cache), generator));

        Self {
            config: Arc::new(config),
            repo,
            cache,
            console,
            gate: Arc::new(AuthGate::new(auth)),
            ws_manager: Arc::new(WsManager::new()),
        }
    }
}
