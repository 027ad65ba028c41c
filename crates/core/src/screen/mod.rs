//! Headless view controllers: each screen owns the stores behind one list
//! view and translates user intents into fetches, mutations, cache
//! invalidation and toasts. Rendering is left to whatever frontend drains
//! the snapshots.

mod categories;
mod notes;
mod tasks;

pub use categories::{CategoriesScreen, CATEGORIES_PER_PAGE};
pub use notes::NotesPane;
pub use tasks::{TasksScreen, TASKS_PER_PAGE};
