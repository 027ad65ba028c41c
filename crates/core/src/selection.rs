use crate::model::Task;

/// The set of tasks currently marked for bulk actions.
///
/// Membership is keyed by task id, never by instance: a re-fetched page hands
/// out fresh `Task` values for the same logical rows, and toggling one of
/// those must still deselect the row picked from the previous fetch.
///
/// Order of insertion is preserved so bulk requests carry ids in the order
/// the user picked them. One store exists per tasks screen; it is created
/// empty and dropped with the screen, never persisted.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: Vec<Task>,
    version: u64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the task if its id is absent, remove it otherwise. Toggling the
    /// same id twice restores the prior membership.
    pub fn toggle(&mut self, task: &Task) {
        if let Some(pos) = self.selected.iter().position(|t| t.id == task.id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(task.clone());
        }
        self.version += 1;
    }

    /// Replace the entire selection with `tasks` ("select all on this page").
    /// An empty slice clears the selection.
    pub fn select_all(&mut self, tasks: &[Task]) {
        self.selected.clear();
        for task in tasks {
            if !self.contains(&task.id) {
                self.selected.push(task.clone());
            }
        }
        self.version += 1;
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.version += 1;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.selected
    }

    pub fn ids(&self) -> Vec<String> {
        self.selected.iter().map(|t| t.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Bumped on every mutation; consumers re-render when it changes.
    pub fn version(&self) -> u64 {
        self.version
    }
}
