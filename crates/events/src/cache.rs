//! The live project cache.
//!
//! A `tokio::sync::watch` channel holds the current [`CacheState`]. One
//! driver task owns the repository subscription and replaces the state
//! wholesale on every delivery, so readers always see one complete snapshot
//! or none at all.
//!
//! ```text
//! Uninitialized --mount--> Subscribing --snapshot--> Ready --snapshot--> Ready
//!                               |                      |
//!                               +-------error----------+--> Failed --mount--> Subscribing
//! ```
//!
//! Unmounting from any state releases the subscription and returns to
//! `Uninitialized`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use folio_core::notice;
use folio_core::ordering::sort_by_recency;
use folio_core::project::Project;
use folio_store::{
    Disposer, ProjectRepository, ProjectSubscription, StoreError, SubscriptionError,
};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where the cache is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// Not mounted.
    Uninitialized,
    /// Mounted, waiting for the first snapshot.
    Subscribing,
    /// Holds the latest snapshot, sorted most recent first.
    Ready(Arc<Vec<Project>>),
    /// The stream broke. Nothing is exposed until the next mount.
    Failed(SubscriptionError),
}

impl CacheState {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Subscribing => "subscribing",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "failed",
        }
    }

    /// The current list, only while `Ready`.
    pub fn projects(&self) -> Option<&Arc<Vec<Project>>> {
        match self {
            Self::Ready(projects) => Some(projects),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Serializable rendering for HTTP and WebSocket clients.
    pub fn view(&self) -> CacheView {
        CacheView {
            status: self.status(),
            projects: self.projects().map(|p| p.as_ref().clone()),
            error: self.is_failed().then(|| notice::FETCH_FAILED.to_string()),
        }
    }
}

/// Wire form of a [`CacheState`].
///
/// `projects` is present only when ready; `error` only when failed.
#[derive(Debug, Clone, Serialize)]
pub struct CacheView {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// LiveProjectCache
// ---------------------------------------------------------------------------

struct Driver {
    disposer: Disposer,
    task: JoinHandle<()>,
}

struct Shared {
    state: watch::Sender<CacheState>,
    /// Bumped under the watch lock on every mount/unmount. A driver only
    /// writes while its own epoch is current, so a superseded driver can
    /// never overwrite its successor's state.
    epoch: AtomicU64,
}

/// Process-wide projection of the `projects` collection.
///
/// Shared by reference (`Arc<LiveProjectCache>`). Nothing mutates the list
/// directly: writes go through the repository and become visible with the
/// next snapshot.
pub struct LiveProjectCache {
    shared: Arc<Shared>,
    driver: Mutex<Option<Driver>>,
}

impl LiveProjectCache {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CacheState::Uninitialized);
        Self {
            shared: Arc::new(Shared {
                state,
                epoch: AtomicU64::new(0),
            }),
            driver: Mutex::new(None),
        }
    }

    /// Open the subscription and start at `Subscribing`.
    ///
    /// Mounting an already mounted cache releases the old subscription
    /// first, which is how a `Failed` cache is restarted.
    pub fn mount(&self, repo: &ProjectRepository) {
        let mut driver = self.driver.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = driver.take() {
            old.release();
        }

        let mut epoch = 0;
        self.shared.state.send_modify(|state| {
            epoch = self.shared.epoch.fetch_add(1, Ordering::AcqRel) + 1;
            *state = CacheState::Subscribing;
        });

        let subscription = repo.subscribe();
        let disposer = subscription.disposer();
        let task = tokio::spawn(drive(subscription, Arc::clone(&self.shared), epoch));
        *driver = Some(Driver { disposer, task });
        tracing::info!(epoch, path = %repo.path(), "Project cache mounted");
    }

    /// Restart at `Subscribing` with a fresh subscription.
    pub fn resubscribe(&self, repo: &ProjectRepository) {
        tracing::info!("Project cache resubscribing");
        self.mount(repo);
    }

    /// Release the subscription and return to `Uninitialized`. Safe to call
    /// in any state, any number of times.
    pub fn unmount(&self) {
        let mut driver = self.driver.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(old) = driver.take() else {
            return;
        };
        old.release();
        self.shared.state.send_modify(|state| {
            self.shared.epoch.fetch_add(1, Ordering::AcqRel);
            *state = CacheState::Uninitialized;
        });
        tracing::info!("Project cache unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.driver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Current state. Cheap: the list is behind an `Arc`.
    pub fn state(&self) -> CacheState {
        self.shared.state.borrow().clone()
    }

    /// Current list, `None` unless `Ready`.
    pub fn projects(&self) -> Option<Arc<Vec<Project>>> {
        self.shared.state.borrow().projects().cloned()
    }

    /// Look a project up in the current list.
    pub fn find(&self, id: &str) -> Option<Project> {
        self.shared
            .state
            .borrow()
            .projects()
            .and_then(|list| list.iter().find(|p| p.id == id).cloned())
    }

    /// Receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<CacheState> {
        self.shared.state.subscribe()
    }
}

impl Default for LiveProjectCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LiveProjectCache {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl Driver {
    fn release(self) {
        self.disposer.dispose();
        // The task exits on its own once the stream is released; aborting
        // covers a task parked in a backend send.
        self.task.abort();
    }
}

impl Shared {
    /// Replace the state if `epoch` is still current.
    fn publish(&self, epoch: u64, next: CacheState) -> bool {
        self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::Acquire) != epoch {
                return false;
            }
            *state = next;
            true
        })
    }
}

/// Driver loop: one subscription, one epoch.
async fn drive(mut subscription: ProjectSubscription, shared: Arc<Shared>, epoch: u64) {
    while let Some(event) = subscription.next().await {
        match event {
            Ok(mut projects) => {
                sort_by_recency(&mut projects);
                let count = projects.len();
                if shared.publish(epoch, CacheState::Ready(Arc::new(projects))) {
                    tracing::debug!(epoch, count, "Project cache updated");
                }
            }
            Err(err) => {
                tracing::error!(epoch, error = %err, "Project subscription failed");
                shared.publish(epoch, CacheState::Failed(err));
                subscription.unsubscribe();
                return;
            }
        }
    }

    // The stream ended without an error. If nobody released it, the
    // backend went away, which readers must see as a failure.
    if !subscription.disposer().is_disposed() {
        let err = SubscriptionError(StoreError::Unavailable("subscription closed".into()));
        tracing::error!(epoch, error = %err, "Project subscription ended unexpectedly");
        shared.publish(epoch, CacheState::Failed(err));
    }
    subscription.unsubscribe();
}
