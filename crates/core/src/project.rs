//! The project record, the only persisted entity.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::notice;
use crate::types::{DocId, Timestamp};

/// Entity name used in [`CoreError::NotFound`].
pub const ENTITY: &str = "Project";

/// A project as held by the live cache and rendered by both views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identifier, stable for the record's lifetime.
    pub id: DocId,
    pub title: String,
    pub description: String,
    /// Remote URL or embedded `data:` URI. `None` renders without media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation time. `None` only for a record whose timestamp has not
    /// resolved yet; such records sort as most recent.
    pub created_at: Option<Timestamp>,
}

impl Project {
    /// Whether the record carries an image worth rendering.
    pub fn has_media(&self) -> bool {
        self.image.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The editable subset of this record.
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
        }
    }
}

/// The fields a create or update writes. `createdAt` is deliberately
/// absent: it is stamped once by the repository on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProjectFields {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check that title and description are present.
    ///
    /// Whitespace-only text counts as empty.
    pub fn validate(&self) -> Result<(), CoreError> {
        if is_blank(&self.title) || is_blank(&self.description) {
            return Err(CoreError::Validation(notice::REQUIRED_FIELDS.into()));
        }
        Ok(())
    }

    /// Collapse an empty image string to `None`.
    pub fn normalized(mut self) -> Self {
        if self.image.as_deref().is_some_and(str::is_empty) {
            self.image = None;
        }
        self
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
