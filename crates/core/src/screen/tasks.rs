use std::sync::Arc;
use std::time::Instant;

use crate::bus::{Entity, InvalidationBus};
use crate::error::InvalidDraft;
use crate::list::{ListSnapshot, ListStore};
use crate::model::{Task, TaskDraft, TaskPatch, TaskStatus};
use crate::remote::{PageFetcher, TaskGateway};
use crate::search::SearchInput;
use crate::selection::SelectionStore;
use crate::toast::ToastTray;

pub const TASKS_PER_PAGE: u32 = 10;

/// The tasks list view: paginated/searchable task pages plus the selection
/// driving the bulk toolbar.
///
/// Mutation contract: every successful mutation invalidates the tasks cache
/// and refetches the current page. A successful bulk delete also clears the
/// selection; a successful bulk status update deliberately keeps it, so the
/// user can apply a second action to the same rows. Failures leave both
/// selection and cached data untouched and surface exactly one error toast.
pub struct TasksScreen<G> {
    gateway: Arc<G>,
    list: ListStore<Task, Arc<G>>,
    selection: SelectionStore,
    search: SearchInput,
    toasts: ToastTray,
    bus: InvalidationBus,
}

impl<G> TasksScreen<G>
where
    G: TaskGateway + PageFetcher<Task>,
{
    pub fn new(gateway: Arc<G>, bus: InvalidationBus, toasts: ToastTray) -> Self {
        let list = ListStore::new(Entity::Tasks, TASKS_PER_PAGE, gateway.clone(), bus.clone());
        Self {
            gateway,
            list,
            selection: SelectionStore::new(),
            search: SearchInput::new(),
            toasts,
            bus,
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<Task> {
        self.list.snapshot()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn search(&self) -> &SearchInput {
        &self.search
    }

    pub fn toasts(&self) -> &ToastTray {
        &self.toasts
    }

    pub async fn refresh(&self) {
        if let Err(err) = self.list.refresh().await {
            self.toasts
                .error("Error", format!("Could not load tasks: {}", err));
        }
    }

    pub async fn go_to_page(&self, page: u32) {
        self.list.set_page(page);
        self.refresh().await;
    }

    pub async fn next_page(&self) {
        let snap = self.snapshot();
        if snap.has_next_page {
            self.go_to_page(snap.page + 1).await;
        }
    }

    pub async fn previous_page(&self) {
        let snap = self.snapshot();
        if snap.has_previous_page {
            self.go_to_page(snap.page - 1).await;
        }
    }

    /// Record a keystroke in the search box; nothing is fetched until the
    /// debounce commits via [`TasksScreen::tick`].
    pub fn type_search<T: Into<String>>(&mut self, text: T, now: Instant) {
        self.search.set_raw(text, now);
    }

    /// Commit a pending search once its quiet period has elapsed. A changed
    /// term resets to page 1 and refetches.
    pub async fn tick(&mut self, now: Instant) {
        if let Some(term) = self.search.poll(now) {
            self.list
                .set_search(if term.is_empty() { None } else { Some(term) });
            self.refresh().await;
        }
    }

    pub fn toggle(&mut self, task: &Task) {
        self.selection.toggle(task);
    }

    /// Select exactly the rows on the current page.
    pub fn select_page(&mut self) {
        let snap = self.list.snapshot();
        self.selection.select_all(&snap.data);
    }

    pub fn select_none(&mut self) {
        self.selection.clear();
    }

    /// Delete every selected task in one request. No-op when nothing is
    /// selected, so a disabled toolbar is not the only guard.
    pub async fn bulk_delete(&mut self) {
        let ids = self.selection.ids();
        if ids.is_empty() {
            return;
        }
        match self.gateway.bulk_delete(&ids).await {
            Ok(_) => {
                self.toasts
                    .success("Success", "Selected tasks were deleted successfully.");
                self.bus.invalidate(Entity::Tasks);
                self.selection.clear();
                self.refresh().await;
            }
            Err(err) => {
                self.toasts.error(
                    "Error",
                    format!("An error occurred while deleting tasks: {}", err),
                );
            }
        }
    }

    /// Move every selected task to `status` in one request. The selection
    /// survives so another bulk action can follow immediately.
    pub async fn bulk_set_status(&mut self, status: TaskStatus) {
        let ids = self.selection.ids();
        if ids.is_empty() {
            return;
        }
        match self.gateway.bulk_set_status(&ids, status).await {
            Ok(_) => {
                self.toasts.success(
                    "Success",
                    format!("Selected tasks were moved to {}.", status),
                );
                self.bus.invalidate(Entity::Tasks);
                self.refresh().await;
            }
            Err(err) => {
                self.toasts.error(
                    "Error",
                    format!("An error occurred while updating tasks: {}", err),
                );
            }
        }
    }

    /// Validation failures are returned for inline display and never reach
    /// the network; request failures become a toast and yield `Ok(None)`.
    pub async fn create(&mut self, draft: TaskDraft) -> Result<Option<Task>, InvalidDraft> {
        draft.validate()?;
        match self.gateway.create_task(&draft).await {
            Ok(task) => {
                self.toasts.success("Success", "Task created successfully.");
                self.bus.invalidate(Entity::Tasks);
                self.refresh().await;
                Ok(Some(task))
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not create task: {}", err));
                Ok(None)
            }
        }
    }

    pub async fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Option<Task>, InvalidDraft> {
        patch.validate()?;
        if patch.is_empty() {
            return Ok(None);
        }
        match self.gateway.update_task(id, &patch).await {
            Ok(task) => {
                self.toasts.success("Success", "Task updated successfully.");
                self.bus.invalidate(Entity::Tasks);
                self.refresh().await;
                Ok(Some(task))
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not update task: {}", err));
                Ok(None)
            }
        }
    }

    pub async fn delete(&mut self, id: &str) {
        match self.gateway.delete_task(id).await {
            Ok(_) => {
                self.toasts.success("Success", "Task deleted successfully.");
                self.bus.invalidate(Entity::Tasks);
                self.refresh().await;
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not delete task: {}", err));
            }
        }
    }

    /// Unlink a task from its category.
    pub async fn detach_category(&mut self, id: &str) {
        match self.gateway.detach_category(id).await {
            Ok(_) => {
                self.toasts
                    .success("Success", "Category removed from task.");
                self.bus.invalidate(Entity::Tasks);
                self.refresh().await;
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not remove category: {}", err));
            }
        }
    }
}
