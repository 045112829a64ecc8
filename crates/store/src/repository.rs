//! Repository adapter for the `projects` collection.
//!
//! Pins every call to one [`CollectionPath`] and translates between the
//! wire documents and [`Project`] records. Nothing else in the workspace
//! talks to a [`DocumentStore`] directly.

use std::sync::Arc;

use chrono::Utc;
use folio_core::project::{Project, ProjectFields};
use folio_core::types::DocId;

use crate::document::{DocumentPatch, ProjectDocument};
use crate::error::{SubscriptionError, WriteError};
use crate::path::CollectionPath;
use crate::subscription::{Disposer, Subscription};
use crate::DocumentStore;

/// Provides subscribe / create / update / delete for projects.
#[derive(Clone)]
pub struct ProjectRepository {
    store: Arc<dyn DocumentStore>,
    path: CollectionPath,
}

impl ProjectRepository {
    pub fn new(store: Arc<dyn DocumentStore>, path: CollectionPath) -> Self {
        Self { store, path }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Open a live stream of the full project set.
    pub fn subscribe(&self) -> ProjectSubscription {
        tracing::debug!(
            path = %self.path,
            backend = self.store.backend_name(),
            "Subscribing to projects"
        );
        ProjectSubscription {
            inner: self.store.subscribe(&self.path),
        }
    }

    /// Insert a project stamped with the current time, returning its id.
    ///
    /// Invalid fields are refused before the store is contacted.
    pub async fn create(&self, fields: &ProjectFields) -> Result<DocId, WriteError> {
        fields.validate()?;
        let doc = ProjectDocument::new(&fields.clone().normalized(), Utc::now());
        let id = self.store.create(&self.path, &doc).await.inspect_err(|e| {
            tracing::warn!(path = %self.path, error = %e, "Project create rejected");
        })?;
        tracing::info!(project_id = %id, "Project created");
        Ok(id)
    }

    /// Rewrite title, description and image of an existing project.
    /// `createdAt` is never sent.
    pub async fn update(&self, id: &str, fields: &ProjectFields) -> Result<(), WriteError> {
        fields.validate()?;
        let patch = DocumentPatch::from(&fields.clone().normalized());
        self.store
            .update(&self.path, id, &patch)
            .await
            .inspect_err(|e| {
                tracing::warn!(project_id = %id, error = %e, "Project update rejected");
            })?;
        tracing::info!(project_id = %id, "Project updated");
        Ok(())
    }

    /// Remove a project. Removing an already-removed project succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), WriteError> {
        self.store.delete(&self.path, id).await.inspect_err(|e| {
            tracing::warn!(project_id = %id, error = %e, "Project delete rejected");
        })?;
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }
}

/// Live stream of project snapshots.
///
/// Yields the full, unsorted project set per change in store order, then
/// at most one [`SubscriptionError`]. Dropping it releases the stream.
pub struct ProjectSubscription {
    inner: Subscription,
}

impl ProjectSubscription {
    pub async fn next(&mut self) -> Option<Result<Vec<Project>, SubscriptionError>> {
        let event = self.inner.next().await?;
        Some(
            event
                .map(|docs| docs.into_iter().map(|d| d.into_project()).collect())
                .map_err(SubscriptionError),
        )
    }

    pub fn disposer(&self) -> Disposer {
        self.inner.disposer()
    }

    /// Release the stream. Idempotent.
    pub fn unsubscribe(&self) {
        self.inner.unsubscribe();
    }
}
