use folio_core::error::CoreError;
use folio_core::notice::{self, Notice};
use folio_core::types::DocId;
use folio_genai::GenerationError;
use folio_store::WriteError;

/// Which generation a [`ConsoleError::Generation`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Description,
    Image,
}

/// A console command that did not go through.
///
/// Every variant maps to exactly one user notice via
/// [`ConsoleError::notice`]; none of them reach a user in raw form.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Input refused before any network call. Carries the notice text.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The project to edit is not in the current list.
    #[error("Project {0} not found")]
    NotFound(DocId),

    /// Create or update rejected by the store.
    #[error("Failed to save project: {0}")]
    SaveFailed(WriteError),

    /// Delete rejected by the store.
    #[error("Failed to delete project: {0}")]
    DeleteFailed(WriteError),

    #[error("Generation failed: {source}")]
    Generation {
        kind: GenerationKind,
        source: GenerationError,
    },
}

impl ConsoleError {
    pub fn notice(&self) -> Notice {
        Notice::error(self.user_message())
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(_) => notice::NO_PROJECT_SELECTED.to_string(),
            Self::SaveFailed(_) => notice::PROJECT_SAVE_FAILED.to_string(),
            Self::DeleteFailed(_) => notice::PROJECT_DELETE_FAILED.to_string(),
            Self::Generation { kind, source } => {
                // An answer without content reads as "try again"; a request
                // that never completed reads as an error.
                let msg = match (kind, source.service_answered()) {
                    (GenerationKind::Description, true) => notice::DESCRIPTION_GENERATION_FAILED,
                    (GenerationKind::Description, false) => notice::DESCRIPTION_GENERATION_ERROR,
                    (GenerationKind::Image, true) => notice::IMAGE_GENERATION_FAILED,
                    (GenerationKind::Image, false) => notice::IMAGE_GENERATION_ERROR,
                };
                msg.to_string()
            }
        }
    }

    /// Classify a save failure. A validation failure the repository caught
    /// stays a validation error.
    pub(crate) fn from_save(err: WriteError) -> Self {
        match err {
            WriteError::Invalid(core) => core.into(),
            rejected => Self::SaveFailed(rejected),
        }
    }
}

impl From<CoreError> for ConsoleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::NotFound { id, .. } => Self::NotFound(id),
            other => Self::Validation(other.user_message()),
        }
    }
}
