//! Admin command handler.
//!
//! [`Console`] owns the form state and turns each admin action into at
//! most one repository or generator call. The form sits behind a mutex
//! that is never held across an await, so commands may overlap: a second
//! generation can start while the first is in flight, and a delete can be
//! confirmed while a save is pending.
//!
//! Overlapping generations are not cancelled. Each result is written into
//! the form when it arrives, so the last one to arrive wins, even over a
//! manual edit made in the meantime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use folio_core::notice::{self, Notice};
use folio_core::{media, prompts};
use folio_events::LiveProjectCache;
use folio_genai::ContentGenerator;
use folio_store::ProjectRepository;
use serde::Serialize;

use crate::deletes::{PendingDeletes, Ticket};
use crate::error::{ConsoleError, GenerationKind};
use crate::form::{FormEdit, FormMode, ProjectForm};

#[derive(Default)]
struct ConsoleState {
    form: ProjectForm,
    /// In-flight generation calls, by kind.
    generating_description: u32,
    generating_image: u32,
}

/// Serializable snapshot of the console.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleView {
    pub form: ProjectForm,
    /// `"create"` or `"update"`.
    pub mode: &'static str,
    pub generating_description: bool,
    pub generating_image: bool,
}

/// A delete awaiting confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct DeletePrompt {
    pub ticket: Ticket,
    pub project_id: String,
    pub notice: Notice,
}

/// The admin command handler.
///
/// Shared as `Arc<Console>`. Reads projects from the shared cache, writes
/// through the repository, and never touches the cache directly.
pub struct Console {
    repo: ProjectRepository,
    cache: Arc<LiveProjectCache>,
    generator: Arc<dyn ContentGenerator>,
    state: Mutex<ConsoleState>,
    deletes: PendingDeletes,
}

impl Console {
    pub fn new(
        repo: ProjectRepository,
        cache: Arc<LiveProjectCache>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            repo,
            cache,
            generator,
            state: Mutex::new(ConsoleState::default()),
            deletes: PendingDeletes::new(),
        }
    }

    pub fn view(&self) -> ConsoleView {
        let state = self.lock();
        ConsoleView {
            mode: match state.form.mode() {
                FormMode::Create => "create",
                FormMode::Update(_) => "update",
            },
            form: state.form.clone(),
            generating_description: state.generating_description > 0,
            generating_image: state.generating_image > 0,
        }
    }

    pub fn form(&self) -> ProjectForm {
        self.lock().form.clone()
    }

    // -----------------------------------------------------------------------
    // Form
    // -----------------------------------------------------------------------

    pub fn edit_form(&self, edit: FormEdit) -> ProjectForm {
        let mut state = self.lock();
        state.form.apply(edit);
        state.form.clone()
    }

    /// Clear the form and return to create mode.
    pub fn reset(&self) -> ProjectForm {
        let mut state = self.lock();
        state.form = ProjectForm::default();
        state.form.clone()
    }

    /// Load a project from the shared cache into the form for editing.
    pub fn select_for_edit(&self, id: &str) -> Result<ProjectForm, ConsoleError> {
        let project = self
            .cache
            .find(id)
            .ok_or_else(|| ConsoleError::NotFound(id.to_string()))?;
        let mut state = self.lock();
        state.form.load(&project);
        tracing::debug!(project_id = %id, "Project selected for edit");
        Ok(state.form.clone())
    }

    // -----------------------------------------------------------------------
    // Submit
    // -----------------------------------------------------------------------

    /// Create or update, depending on the form's mode.
    ///
    /// Refused while a generation is in flight, since its result would land
    /// in the form after the save. Validation runs next and nothing is sent
    /// on failure. A successful write clears the form; a failed one leaves
    /// it as typed.
    pub async fn submit(&self) -> Result<Notice, ConsoleError> {
        let (fields, mode) = {
            let state = self.lock();
            if state.generating_description > 0 || state.generating_image > 0 {
                return Err(ConsoleError::Validation(
                    notice::GENERATION_IN_PROGRESS.to_string(),
                ));
            }
            (state.form.fields(), state.form.mode())
        };
        fields.validate()?;

        let message = match &mode {
            FormMode::Create => {
                self.repo
                    .create(&fields)
                    .await
                    .map_err(ConsoleError::from_save)?;
                notice::PROJECT_ADDED
            }
            FormMode::Update(id) => {
                self.repo
                    .update(id, &fields)
                    .await
                    .map_err(ConsoleError::from_save)?;
                notice::PROJECT_UPDATED
            }
        };

        self.lock().form = ProjectForm::default();
        Ok(Notice::info(message))
    }

    // -----------------------------------------------------------------------
    // Generation
    // -----------------------------------------------------------------------

    /// Generate a description from the title and keywords.
    pub async fn generate_description(&self) -> Result<Notice, ConsoleError> {
        let (title, keywords) = {
            let mut state = self.lock();
            if state.form.title.trim().is_empty() {
                return Err(ConsoleError::Validation(
                    notice::TITLE_REQUIRED_FOR_DESCRIPTION.into(),
                ));
            }
            state.generating_description += 1;
            (state.form.title.clone(), state.form.keywords.clone())
        };
        let _in_flight = InFlight::new(&self.state, GenerationKind::Description);

        let prompt = prompts::description_prompt(&title, &keywords);
        let text = self
            .generator
            .generate_text(&prompt)
            .await
            .map_err(|source| ConsoleError::Generation {
                kind: GenerationKind::Description,
                source,
            })?;

        self.lock().form.description = text;
        tracing::info!(%title, "Description generated");
        Ok(Notice::info(notice::DESCRIPTION_GENERATED))
    }

    /// Generate an image from the title and keywords. The current image is
    /// cleared as soon as generation starts.
    pub async fn generate_image(&self) -> Result<Notice, ConsoleError> {
        let (title, keywords) = {
            let mut state = self.lock();
            if state.form.title.trim().is_empty() {
                return Err(ConsoleError::Validation(
                    notice::TITLE_REQUIRED_FOR_IMAGE.into(),
                ));
            }
            state.form.image = None;
            state.generating_image += 1;
            (state.form.title.clone(), state.form.keywords.clone())
        };
        let _in_flight = InFlight::new(&self.state, GenerationKind::Image);

        let prompt = prompts::image_prompt(&title, &keywords);
        let payload = self
            .generator
            .generate_image(&prompt, prompts::IMAGE_SAMPLE_COUNT)
            .await
            .map_err(|source| ConsoleError::Generation {
                kind: GenerationKind::Image,
                source,
            })?;

        self.lock().form.image = Some(media::generated_image_uri(&payload));
        tracing::info!(%title, "Image generated");
        Ok(Notice::info(notice::IMAGE_GENERATED))
    }

    // -----------------------------------------------------------------------
    // Upload
    // -----------------------------------------------------------------------

    /// Attach an uploaded image file. A rejected file also clears the
    /// current image.
    pub fn upload(&self, bytes: &[u8]) -> Result<Notice, ConsoleError> {
        let encoded = media::encode_upload(bytes);
        let mut state = self.lock();
        match encoded {
            Ok(uri) => {
                state.form.image = Some(uri);
                Ok(Notice::info(notice::IMAGE_ATTACHED))
            }
            Err(err) => {
                state.form.image = None;
                tracing::debug!(size = bytes.len(), error = %err, "Upload rejected");
                Err(err.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// First phase: ask for confirmation. Nothing is written.
    pub fn request_delete(&self, project_id: &str) -> DeletePrompt {
        let ticket = self.deletes.request(project_id);
        tracing::debug!(project_id, %ticket, "Delete requested");
        DeletePrompt {
            ticket,
            project_id: project_id.to_string(),
            notice: Notice::confirm(notice::PROJECT_DELETE_CONFIRM),
        }
    }

    /// Second phase: delete the project behind `ticket`.
    ///
    /// A ticket already used, cancelled or expired deletes nothing and
    /// reports that there was nothing to confirm.
    pub async fn confirm_delete(&self, ticket: &str) -> Result<Notice, ConsoleError> {
        let Some(project_id) = self.deletes.take(ticket) else {
            return Ok(Notice::info(notice::NOTHING_TO_CONFIRM));
        };
        self.repo
            .delete(&project_id)
            .await
            .map_err(ConsoleError::DeleteFailed)?;
        Ok(Notice::info(notice::PROJECT_DELETED))
    }

    pub fn cancel_delete(&self, ticket: &str) -> Notice {
        if self.deletes.cancel(ticket) {
            tracing::debug!(%ticket, "Delete cancelled");
        }
        Notice::info(notice::DELETE_CANCELLED)
    }

    pub fn pending_deletes(&self) -> usize {
        self.deletes.len()
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<ConsoleState>) -> MutexGuard<'_, ConsoleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Decrements the in-flight counter for `kind` when dropped, so the
/// counter is correct on every exit path.
struct InFlight<'a> {
    state: &'a Mutex<ConsoleState>,
    kind: GenerationKind,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<ConsoleState>, kind: GenerationKind) -> Self {
        Self { state, kind }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        let counter = match self.kind {
            GenerationKind::Description => &mut state.generating_description,
            GenerationKind::Image => &mut state.generating_image,
        };
        *counter = counter.saturating_sub(1);
    }
}
