//! Document store access for the `projects` collection.
//!
//! - [`DocumentStore`] -- the seam to the hosted document database.
//! - [`memory::MemoryStore`] -- in-process backend for development and tests.
//! - [`firestore::FirestoreStore`] -- Firestore REST backend.
//! - [`repository::ProjectRepository`] -- the only component that issues
//!   reads or writes; everything above it goes through here.
//! - [`subscription::Subscription`] -- a live snapshot stream that releases
//!   itself on drop.

pub mod document;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod path;
pub mod repository;
pub mod subscription;

use async_trait::async_trait;
use folio_core::types::DocId;

pub use document::{DocumentPatch, ProjectDocument, StoredDocument};
pub use error::{StoreError, SubscriptionError, WriteError};
pub use path::CollectionPath;
pub use repository::{ProjectRepository, ProjectSubscription};
pub use subscription::{Disposer, Subscription};

/// A hosted collection of project documents.
///
/// Implementations must deliver the *full* current collection on every
/// change, deliver at most one error per subscription and then stop, and
/// treat deleting a missing document as success.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Open a live snapshot stream on `path`.
    ///
    /// Failures arrive through the stream, never as a return value.
    fn subscribe(&self, path: &CollectionPath) -> Subscription;

    /// Insert a document, returning the store-assigned id.
    async fn create(&self, path: &CollectionPath, doc: &ProjectDocument)
        -> Result<DocId, StoreError>;

    /// Replace the patchable fields of an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] when `id` does not exist.
    async fn update(
        &self,
        path: &CollectionPath,
        id: &str,
        patch: &DocumentPatch,
    ) -> Result<(), StoreError>;

    /// Remove a document. Removing a missing document succeeds.
    async fn delete(&self, path: &CollectionPath, id: &str) -> Result<(), StoreError>;

    /// Attach (or clear) the bearer credential used for later requests.
    async fn authorize(&self, _id_token: Option<String>) {}
}
