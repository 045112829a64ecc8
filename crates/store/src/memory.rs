//! In-process document store.
//!
//! Holds each collection as an insertion-ordered map so snapshots report
//! documents in creation order, the same way the hosted store does. Every
//! write fans out a change notice on a broadcast channel; each subscription
//! task re-reads its collection and delivers the full set.
//!
//! Besides serving local development, the store can be told to refuse
//! writes or to break live subscriptions, which is how the failure paths of
//! the layers above are exercised.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use folio_core::types::DocId;
use indexmap::IndexMap;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::document::{DocumentPatch, ProjectDocument, StoredDocument};
use crate::error::StoreError;
use crate::path::CollectionPath;
use crate::subscription::Subscription;
use crate::DocumentStore;

/// Buffer of the change-notice channel.
const CHANGE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
enum Change {
    /// The named collection was written.
    Written(CollectionPath),
    /// Break every live subscription on the named collection.
    Fault(CollectionPath, StoreError),
}

#[derive(Default)]
struct MemoryState {
    collections: HashMap<CollectionPath, IndexMap<DocId, ProjectDocument>>,
    /// When set, every write is refused with this reason.
    writes_refused: Option<String>,
    /// Number of write calls received, accepted or not.
    write_attempts: u64,
}

/// Document store held entirely in process memory.
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    changes: broadcast::Sender<Change>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            changes,
        }
    }

    /// Refuse every subsequent write with `reason`, or accept writes again
    /// with `None`.
    pub fn refuse_writes(&self, reason: Option<&str>) {
        self.lock().writes_refused = reason.map(str::to_string);
    }

    /// Break every live subscription on `path` with `cause`.
    pub fn break_subscriptions(&self, path: &CollectionPath, cause: StoreError) {
        let _ = self.changes.send(Change::Fault(path.clone(), cause));
    }

    /// Number of create/update/delete calls received so far.
    pub fn write_attempts(&self) -> u64 {
        self.lock().write_attempts
    }

    /// Current contents of `path`, in insertion order.
    pub fn documents(&self, path: &CollectionPath) -> Vec<StoredDocument> {
        snapshot(&self.state, path)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the attempt and check whether writes are currently refused.
    fn begin_write(&self, state: &mut MemoryState) -> Result<(), StoreError> {
        state.write_attempts += 1;
        match &state.writes_refused {
            Some(reason) => Err(StoreError::PermissionDenied(reason.clone())),
            None => Ok(()),
        }
    }

    fn notify(&self, path: &CollectionPath) {
        // No receivers just means nobody is subscribed.
        let _ = self.changes.send(Change::Written(path.clone()));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot(state: &Mutex<MemoryState>, path: &CollectionPath) -> Vec<StoredDocument> {
    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
    state
        .collections
        .get(path)
        .map(|docs| {
            docs.iter()
                .map(|(id, data)| StoredDocument {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn subscribe(&self, path: &CollectionPath) -> Subscription {
        let (sink, subscription) = Subscription::channel();
        // Subscribe to change notices before reading the initial snapshot
        // so no write can slip between the two.
        let mut changes = self.changes.subscribe();
        let state = Arc::clone(&self.state);
        let path = path.clone();

        tokio::spawn(async move {
            if !sink.send(snapshot(&state, &path)).await {
                return;
            }
            loop {
                tokio::select! {
                    () = sink.released() => break,
                    change = changes.recv() => match change {
                        Ok(Change::Written(written)) if written == path => {
                            if !sink.send(snapshot(&state, &path)).await {
                                break;
                            }
                        }
                        Ok(Change::Fault(faulted, cause)) if faulted == path => {
                            sink.fail(cause).await;
                            break;
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            // Snapshots are full sets, so re-reading once
                            // covers every skipped notice.
                            tracing::debug!(
                                skipped,
                                %path,
                                "Change notices lagged, resending snapshot"
                            );
                            if !sink.send(snapshot(&state, &path)).await {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => {
                            sink.fail(StoreError::Unavailable("store shut down".into())).await;
                            break;
                        }
                    },
                }
            }
            tracing::debug!(%path, "Memory subscription ended");
        });

        subscription
    }

    async fn create(
        &self,
        path: &CollectionPath,
        doc: &ProjectDocument,
    ) -> Result<DocId, StoreError> {
        let id = {
            let mut state = self.lock();
            self.begin_write(&mut state)?;
            let id = uuid::Uuid::new_v4().simple().to_string();
            state
                .collections
                .entry(path.clone())
                .or_default()
                .insert(id.clone(), doc.clone());
            id
        };
        self.notify(path);
        Ok(id)
    }

    async fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<(), StoreError> {
        {
            let mut state = self.lock();
            self.begin_write(&mut state)?;
            let doc = state
                .collections
                .get_mut(path)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            doc.title = patch.title.clone();
            doc.description = patch.description.clone();
            doc.image = patch.image.clone();
        }
        self.notify(path);
        Ok(())
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError> {
        let removed = {
            let mut state = self.lock();
            self.begin_write(&mut state)?;
            state
                .collections
                .get_mut(path)
                .and_then(|docs| docs.shift_remove(id))
                .is_some()
        };
        if removed {
            self.notify(path);
        }
        Ok(())
    }
}
