use folio_core::error::CoreError;
use folio_core::types::DocId;

/// Low-level failure reported by a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocId),

    /// The store's rules engine refused the request.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Network failure, timeout, or the store being down.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other non-success answer from the store.
    #[error("Store rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// A create, update or delete that did not take effect.
///
/// Readers never observe a partial write: on any error the previous
/// document state is retained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// The fields were refused before any request was made.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    #[error("Write rejected: {0}")]
    Rejected(#[from] StoreError),
}

/// The live stream broke. Delivered at most once per subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Subscription failed: {0}")]
pub struct SubscriptionError(pub StoreError);
