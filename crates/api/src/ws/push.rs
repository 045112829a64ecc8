//! Pushes every live cache transition to connected WebSocket clients.

use std::sync::Arc;

use axum::extract::ws::Message;
use folio_events::{CacheState, LiveProjectCache};
use serde_json::json;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// The `{"type": "projects", "state": ...}` frame for a cache state.
pub fn projects_message(state: &CacheState) -> Message {
    let payload = json!({
        "type": "projects",
        "state": state.view(),
    });
    Message::Text(payload.to_string().into())
}

/// Spawn a task that broadcasts the cache state whenever it changes.
///
/// Runs until `cancel` fires or the cache is dropped.
pub fn start_cache_push(
    cache: &LiveProjectCache,
    ws_manager: Arc<WsManager>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut changes = cache.watch();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let message = {
                        let state = changes.borrow_and_update();
                        tracing::debug!(status = state.status(), "Pushing project cache state");
                        projects_message(&state)
                    };
                    ws_manager.broadcast(message).await;
                }
            }
        }
        tracing::info!("Cache push stopped");
    })
}
