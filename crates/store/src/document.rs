//! Wire shapes of the `projects` collection.

use folio_core::project::{Project, ProjectFields};
use folio_core::types::{DocId, Timestamp};
use serde::{Deserialize, Serialize};

/// A project document as stored. The id is not a field: it travels out of
/// band as the document's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl ProjectDocument {
    /// Build a new document from validated fields, stamped with `created_at`.
    pub fn new(fields: &ProjectFields, created_at: Timestamp) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone(),
            image: fields.image.clone(),
            created_at: Some(created_at),
        }
    }
}

/// The fields an update rewrites. `createdAt` is never part of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: String,
    pub description: String,
    /// `None` removes the image.
    pub image: Option<String>,
}

impl From<&ProjectFields> for DocumentPatch {
    fn from(fields: &ProjectFields) -> Self {
        Self {
            title: fields.title.clone(),
            description: fields.description.clone(),
            image: fields.image.clone(),
        }
    }
}

/// A document together with its store address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: DocId,
    pub data: ProjectDocument,
}

impl StoredDocument {
    pub fn into_project(self) -> Project {
        let image = self.data.image.filter(|s| !s.is_empty());
        Project {
            id: self.id,
            title: self.data.title,
            description: self.data.description,
            image,
            created_at: self.data.created_at,
        }
    }
}
