//! User-visible notices.
//!
//! Every remote failure is caught where it happens and turned into a
//! [`Notice`]; nothing propagates to the view layer as a raw error. The
//! message constants below are the complete set of fixed texts a user can
//! see.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Fixed texts
// ---------------------------------------------------------------------------

pub const PROJECT_ADDED: &str = "Project added successfully!";
pub const PROJECT_UPDATED: &str = "Project updated successfully!";
pub const PROJECT_SAVE_FAILED: &str = "Failed to save project.";
pub const PROJECT_DELETE_CONFIRM: &str = "Are you sure you want to delete this project?";
pub const PROJECT_DELETED: &str = "Project deleted successfully!";
pub const PROJECT_DELETE_FAILED: &str = "Failed to delete project.";
pub const DELETE_CANCELLED: &str = "Deletion cancelled.";
pub const NOTHING_TO_CONFIRM: &str = "There is no pending deletion to confirm.";
pub const DELETE_REQUIRES_LOGIN: &str = "You must be logged in to delete projects.";

pub const REQUIRED_FIELDS: &str = "Please fill in all required fields (Title, Description).";
pub const NO_PROJECT_SELECTED: &str = "Select a project to edit first.";
pub const GENERATION_IN_PROGRESS: &str =
    "Please wait for content generation to finish before saving.";

pub const TITLE_REQUIRED_FOR_DESCRIPTION: &str = "Please enter a project title first.";
pub const TITLE_REQUIRED_FOR_IMAGE: &str =
    "Please enter a project title first to generate an image.";
pub const DESCRIPTION_GENERATION_FAILED: &str =
    "Failed to generate description. Please try again.";
pub const DESCRIPTION_GENERATION_ERROR: &str =
    "An error occurred while generating the description.";
pub const IMAGE_GENERATION_FAILED: &str =
    "Failed to generate image. Please try adjusting your title/keywords.";
pub const IMAGE_GENERATION_ERROR: &str = "An error occurred while generating the image.";
pub const DESCRIPTION_GENERATED: &str = "Description generated.";
pub const IMAGE_GENERATED: &str = "Image generated.";

pub const IMAGE_TOO_LARGE: &str =
    "Image is too large. Please use an image under 100KB or use the Image Generator.";
pub const IMAGE_UNSUPPORTED: &str =
    "Unsupported image file. Please choose a PNG, JPEG, WebP or GIF.";
pub const IMAGE_ATTACHED: &str = "Image attached.";

pub const FETCH_FAILED: &str = "Error fetching projects. Please try again later.";

pub const MISSING_CREDENTIALS: &str = "Please enter both email and password.";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const TOO_MANY_ATTEMPTS: &str =
    "Too many failed login attempts. Please try again later.";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const LOGOUT_FAILED: &str = "Logout failed. Please try again.";

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Severity of a notice, which decides how the front end presents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Informational, dismissed with "Close".
    Info,
    /// A failure the user has to acknowledge.
    Error,
    /// A destructive action awaiting an explicit yes/no answer.
    Confirm,
}

/// A message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn confirm(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Confirm,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
