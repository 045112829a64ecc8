//! Live snapshot streams with scoped release.
//!
//! A backend creates a [`SnapshotSink`] / [`Subscription`] pair with
//! [`Subscription::channel`], keeps the sink in its delivery task and hands
//! the subscription to the caller. Releasing the subscription (explicitly or
//! by dropping it) cancels the delivery task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::document::StoredDocument;
use crate::error::StoreError;

/// One delivery: the full collection, or the error that ended the stream.
pub type SnapshotEvent = Result<Vec<StoredDocument>, StoreError>;

/// Snapshots buffered between a backend task and its reader.
const SNAPSHOT_BUFFER: usize = 16;

// ---------------------------------------------------------------------------
// Disposer
// ---------------------------------------------------------------------------

/// Releases a subscription. Cloneable; only the first release has effect.
#[derive(Debug, Clone)]
pub struct Disposer {
    token: CancellationToken,
    released: Arc<AtomicBool>,
}

impl Disposer {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Release the stream. Returns `true` only for the call that actually
    /// released it; later calls are no-ops.
    pub fn dispose(&self) -> bool {
        let first = !self.released.swap(true, Ordering::AcqRel);
        if first {
            self.token.cancel();
        }
        first
    }

    pub fn is_disposed(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// Sink (backend side)
// ---------------------------------------------------------------------------

/// Backend half of a subscription.
pub struct SnapshotSink {
    tx: mpsc::Sender<SnapshotEvent>,
    token: CancellationToken,
}

impl SnapshotSink {
    /// Deliver a full snapshot. Returns `false` once the reader is gone or
    /// the subscription was released; the backend should stop then.
    pub async fn send(&self, docs: Vec<StoredDocument>) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.tx.send(Ok(docs)).await.is_ok()
    }

    /// Deliver the terminal error. The reader ignores anything after it.
    pub async fn fail(&self, cause: StoreError) {
        if !self.token.is_cancelled() {
            let _ = self.tx.send(Err(cause)).await;
        }
    }

    /// Resolves when the subscription is released.
    pub async fn released(&self) {
        self.token.cancelled().await;
    }
}

// ---------------------------------------------------------------------------
// Subscription (reader side)
// ---------------------------------------------------------------------------

/// Reader half of a live snapshot stream.
///
/// Yields full snapshots in delivery order, then at most one error, then
/// nothing. Dropping it releases the stream.
pub struct Subscription {
    rx: mpsc::Receiver<SnapshotEvent>,
    disposer: Disposer,
    finished: bool,
}

impl Subscription {
    /// Create a connected sink / subscription pair.
    pub fn channel() -> (SnapshotSink, Subscription) {
        let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
        let disposer = Disposer::new();
        let sink = SnapshotSink {
            tx,
            token: disposer.token.clone(),
        };
        let subscription = Subscription {
            rx,
            disposer,
            finished: false,
        };
        (sink, subscription)
    }

    /// A subscription that fails immediately, for backends that cannot
    /// even start streaming.
    pub fn failed(cause: StoreError) -> Subscription {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: this cannot fail.
        let _ = tx.try_send(Err(cause));
        Subscription {
            rx,
            disposer: Disposer::new(),
            finished: false,
        }
    }

    /// Next delivery, or `None` once the stream has ended or been released.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        if self.finished || self.disposer.is_disposed() {
            return None;
        }
        let event = self.rx.recv().await;
        match &event {
            None | Some(Err(_)) => self.finished = true,
            Some(Ok(_)) => {}
        }
        event
    }

    /// A handle that can release this subscription from elsewhere.
    pub fn disposer(&self) -> Disposer {
        self.disposer.clone()
    }

    /// Release the stream. Idempotent.
    pub fn unsubscribe(&self) {
        self.disposer.dispose();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.disposer.dispose();
    }
}
