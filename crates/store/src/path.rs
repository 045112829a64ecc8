use std::fmt;

use folio_core::error::CoreError;

/// Absolute path of a collection inside the document store.
///
/// The projects collection is namespaced by the configured application id
/// so one store can host several apps side by side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// `/artifacts/{app_id}/public/data/projects`
    pub fn projects(app_id: &str) -> Result<Self, CoreError> {
        let app_id = app_id.trim();
        if app_id.is_empty() || app_id.contains('/') {
            return Err(CoreError::Validation(format!(
                "Invalid application id '{app_id}': must be non-empty and contain no '/'"
            )));
        }
        Ok(Self(format!("/artifacts/{app_id}/public/data/projects")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
