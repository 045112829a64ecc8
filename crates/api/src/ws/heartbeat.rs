//! Keeps idle live-update sockets open.
//!
//! The showcase page can sit without a cache transition for a long time, and
//! proxies drop sockets that carry nothing. A periodic ping keeps them alive.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::ws::manager::WsManager;

/// Interval between heartbeat pings.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the heartbeat task. It runs until `cancel` fires.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // First tick is one period out; a fresh socket was just greeted with
        // the current project list.
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let count = ws_manager.connection_count().await;
                    if count > 0 {
                        tracing::debug!(count, "WebSocket heartbeat ping");
                        ws_manager.ping_all().await;
                    }
                }
            }
        }
        tracing::info!("Heartbeat stopped");
    })
}

#[cfg(test)]
mod tests {
    use axum::extract::ws::Message;

    use super::*;

    #[tokio::test]
    async fn pings_connections_until_cancelled() {
        let manager = Arc::new(WsManager::new());
        let mut rx = manager.add("conn-1".to_string()).await;
        let cancel = CancellationToken::new();

        let handle = start_heartbeat(manager.clone(), Duration::from_millis(10), cancel.clone());

        let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("no ping within two seconds")
            .expect("channel closed");
        assert!(matches!(frame, Message::Ping(_)));

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("heartbeat did not stop")
            .unwrap();
    }
}
