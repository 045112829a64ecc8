//! The admin project form.

use folio_core::project::{Project, ProjectFields};
use folio_core::types::DocId;
use serde::{Deserialize, Serialize};

/// Whether a submit creates a new project or updates the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update(DocId),
}

/// Local state of the admin form.
///
/// The mode is decided by `editing` alone, never by what the cache holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    /// Remote URL or `data:` URI.
    pub image: Option<String>,
    /// Steers generation; never stored.
    pub keywords: String,
    /// Id of the project being edited, `None` in create mode.
    pub editing: Option<DocId>,
}

impl ProjectForm {
    pub fn mode(&self) -> FormMode {
        match &self.editing {
            Some(id) => FormMode::Update(id.clone()),
            None => FormMode::Create,
        }
    }

    /// The fields a submit would write.
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            title: self.title.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
        }
        .normalized()
    }

    /// Load an existing project and switch to update mode. Keywords are
    /// not part of a project, so they are left as typed.
    pub fn load(&mut self, project: &Project) {
        self.title = project.title.clone();
        self.description = project.description.clone();
        self.image = project.image.clone();
        self.editing = Some(project.id.clone());
    }

    pub fn apply(&mut self, edit: FormEdit) {
        if let Some(title) = edit.title {
            self.title = title;
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(keywords) = edit.keywords {
            self.keywords = keywords;
        }
        if let Some(image) = edit.image {
            self.image = (!image.is_empty()).then_some(image);
        }
    }
}

/// A partial form edit. Absent fields are left alone; an empty `image`
/// clears the image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub keywords: Option<String>,
}
