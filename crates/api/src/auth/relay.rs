//! Forwards the signed-in identity's token to the document store.
//!
//! The hosted store only accepts writes that carry the auth service's ID
//! token. Whenever the gate's session changes, the relay hands the new
//! token (or `None` after sign-out) to [`DocumentStore::authorize`].

use std::sync::Arc;

use folio_store::DocumentStore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::gate::AuthGate;

/// Spawn the relay task. It runs until `cancel` fires.
pub fn start_credential_relay(
    gate: &AuthGate,
    store: Arc<dyn DocumentStore>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut changes = gate.session_changes();

    tokio::spawn(async move {
        // Apply whatever is current before waiting for changes.
        let token = changes
            .borrow_and_update()
            .as_ref()
            .and_then(|s| s.identity.id_token.clone());
        store.authorize(token).await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let token = changes
                        .borrow_and_update()
                        .as_ref()
                        .and_then(|s| s.identity.id_token.clone());
                    tracing::debug!(
                        has_token = token.is_some(),
                        "Relaying credential to document store"
                    );
                    store.authorize(token).await;
                }
            }
        }
        tracing::info!("Credential relay stopped");
    })
}
