use std::sync::Arc;

use parking_lot::Mutex;

use crate::bus::{Entity, InvalidationBus};
use crate::error::InvalidDraft;
use crate::model::{Note, NoteDraft};
use crate::remote::NoteGateway;
use crate::toast::ToastTray;

/// Notes attached to a single task. The server pages this endpoint too, but
/// a task rarely carries more than a handful of notes, so the pane loads them
/// all in one request and skips pagination state entirely.
pub struct NotesPane<G> {
    gateway: Arc<G>,
    task_id: String,
    toasts: ToastTray,
    bus: InvalidationBus,
    state: Mutex<PaneState>,
}

#[derive(Default)]
struct PaneState {
    notes: Vec<Note>,
    error: Option<String>,
    /// Epoch of the notes entity when the list was loaded; `None` before the
    /// first load.
    loaded_epoch: Option<u64>,
}

impl<G: NoteGateway> NotesPane<G> {
    pub fn new<T: Into<String>>(
        gateway: Arc<G>,
        task_id: T,
        bus: InvalidationBus,
        toasts: ToastTray,
    ) -> Self {
        Self {
            gateway,
            task_id: task_id.into(),
            toasts,
            bus,
            state: Mutex::new(PaneState::default()),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.lock().notes.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn toasts(&self) -> &ToastTray {
        &self.toasts
    }

    /// True before the first load and after any notes mutation anywhere in
    /// the app, including other panes.
    pub fn is_stale(&self) -> bool {
        self.state
            .lock()
            .loaded_epoch
            .map(|epoch| epoch != self.bus.epoch(Entity::Notes))
            .unwrap_or(true)
    }

    pub async fn refresh(&self) {
        let epoch = self.bus.epoch(Entity::Notes);
        match self.gateway.notes_for_task(&self.task_id).await {
            Ok(page) => {
                let mut state = self.state.lock();
                state.notes = page.data;
                state.error = None;
                state.loaded_epoch = Some(epoch);
            }
            Err(err) => {
                let mut state = self.state.lock();
                state.error = Some(err.to_string());
                self.toasts
                    .error("Error", format!("Could not load notes: {}", err));
            }
        }
    }

    pub async fn create(&self, draft: NoteDraft) -> Result<Option<Note>, InvalidDraft> {
        draft.validate()?;
        match self
            .gateway
            .create_note(Some(&self.task_id), &draft)
            .await
        {
            Ok(note) => {
                self.toasts.success("Success", "Note created successfully.");
                self.bus.invalidate(Entity::Notes);
                self.refresh().await;
                Ok(Some(note))
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not create note: {}", err));
                Ok(None)
            }
        }
    }

    pub async fn update(&self, id: &str, draft: NoteDraft) -> Result<Option<Note>, InvalidDraft> {
        draft.validate()?;
        match self
            .gateway
            .update_note(id, &draft, Some(&self.task_id))
            .await
        {
            Ok(note) => {
                self.toasts.success("Success", "Note updated successfully.");
                self.bus.invalidate(Entity::Notes);
                self.refresh().await;
                Ok(Some(note))
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not update note: {}", err));
                Ok(None)
            }
        }
    }

    pub async fn delete(&self, id: &str) {
        let ids = [id.to_string()];
        match self.gateway.delete_notes(&ids).await {
            Ok(_) => {
                self.toasts.success("Success", "Note deleted successfully.");
                self.bus.invalidate(Entity::Notes);
                self.refresh().await;
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not delete note: {}", err));
            }
        }
    }
}
