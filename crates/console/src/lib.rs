//! Admin console: the command handler behind the project form.
//!
//! - [`form`] -- form state and partial form edits.
//! - [`console::Console`] -- submit, edit, generate, upload, delete.
//! - [`deletes::PendingDeletes`] -- two-phase delete tickets.
//! - [`error::ConsoleError`] -- failures, each with its user notice.

pub mod console;
pub mod deletes;
pub mod error;
pub mod form;

pub use console::{Console, ConsoleView, DeletePrompt};
pub use error::ConsoleError;
pub use form::{FormEdit, FormMode, ProjectForm};
