pub mod bus;
pub mod error;
pub mod list;
pub mod model;
pub mod remote;
pub mod screen;
pub mod search;
pub mod selection;
pub mod toast;

pub use bus::{Entity, InvalidationBus};
pub use error::{ApiError, InvalidDraft};
pub use list::{ListSnapshot, ListStore};
pub use model::*;
pub use remote::{CategoryGateway, NoteGateway, PageFetcher, TaskGateway};
pub use screen::{CategoriesScreen, NotesPane, TasksScreen, CATEGORIES_PER_PAGE, TASKS_PER_PAGE};
pub use search::{SearchInput, DEFAULT_QUIET_PERIOD};
pub use selection::SelectionStore;
pub use toast::{Toast, ToastKind, ToastTray};
