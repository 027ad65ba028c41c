use clap::{value_parser, Args, Parser, Subcommand};

use taskdeck_core::{TaskPriority, TaskStatus};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskdeck",
    version,
    about = "Task, category and note manager backed by a taskdeck API server.",
    after_help = "Examples:\n  taskdeck tasks --search groceries\n  taskdeck tasks --page 2\n  taskdeck status completed 0191a 0191b\n  taskdeck delete 0191a 0191b\n  taskdeck notes 0191a"
)]
pub struct Cli {
    /// API base URL (defaults to $TASKDECK_API_URL or http://localhost:8000/api/v1)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token for authenticated servers (defaults to $TASKDECK_TOKEN)
    #[arg(long, value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Tracing filter directive (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// List tasks, one page at a time
    Tasks(TasksArgs),
    /// Create a task
    Add(AddArgs),
    /// Update fields on an existing task
    Update(UpdateArgs),
    /// Delete one or more tasks by id
    Delete(DeleteArgs),
    /// Move one or more tasks to a new status
    Status(StatusArgs),
    /// List categories, one page at a time
    Categories(CategoriesArgs),
    /// Show a category with the tasks attached to it
    Category(CategoryArgs),
    /// List the notes attached to a task
    Notes(NotesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TasksArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1, value_parser = value_parser!(u32).range(1..))]
    pub page: u32,

    /// Filter by a search term (matches title and description)
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    #[arg(value_name = "TITLE", required = true)]
    pub title: String,

    /// Longer description
    #[arg(long)]
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    #[arg(long, value_enum)]
    pub status: Option<TaskStatus>,

    /// Priority (defaults to medium)
    #[arg(long, value_enum)]
    pub priority: Option<TaskPriority>,

    /// Due date, RFC 3339 (e.g. 2026-09-01T00:00:00Z)
    #[arg(long = "due", value_name = "DATE")]
    pub due_date: Option<String>,

    /// Attach to a category by id
    #[arg(long = "category", value_name = "ID")]
    pub category_id: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Task id
    #[arg(value_name = "ID", required = true)]
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<TaskStatus>,

    #[arg(long, value_enum)]
    pub priority: Option<TaskPriority>,

    /// Due date, RFC 3339
    #[arg(long = "due", value_name = "DATE")]
    pub due_date: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// One or more task ids to delete in a single request
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// Target status
    #[arg(value_enum)]
    pub status: TaskStatus,

    /// One or more task ids to update in a single request
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CategoriesArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1, value_parser = value_parser!(u32).range(1..))]
    pub page: u32,
}

#[derive(Args, Debug, Clone)]
pub struct CategoryArgs {
    /// Category id
    #[arg(value_name = "ID", required = true)]
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct NotesArgs {
    /// Task id whose notes to list
    #[arg(value_name = "TASK_ID", required = true)]
    pub task_id: String,
}
