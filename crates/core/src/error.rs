use crate::types::DocId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DocId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The message a user should see for this error.
    ///
    /// Validation and authorization messages are already written for
    /// humans; everything else collapses to a generic sentence.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Unauthorized(msg) => msg.clone(),
            Self::NotFound { entity, id } => format!("{entity} with id {id} not found"),
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}
