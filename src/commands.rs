use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use taskdeck_api::ApiClient;
use taskdeck_core::{
    CategoriesScreen, Category, CategoryGateway, InvalidationBus, ListSnapshot, NoteGateway,
    PageFetcher, Task, TaskDraft, TaskGateway, TaskPatch, TasksScreen, ToastTray,
    DEFAULT_QUIET_PERIOD,
};

use crate::cli::{
    AddArgs, CategoriesArgs, CategoryArgs, CliCommand, DeleteArgs, NotesArgs, StatusArgs,
    TasksArgs, UpdateArgs,
};
use crate::config::AppConfig;

pub async fn execute<W: Write>(config: &AppConfig, command: CliCommand, writer: &mut W) -> Result<()> {
    let mut client = ApiClient::new(config.api_url.clone());
    if let Some(token) = &config.token {
        client = client.with_token(token.clone());
    }
    dispatch(Arc::new(client), command, writer).await
}

pub(crate) async fn dispatch<A, W>(api: Arc<A>, command: CliCommand, writer: &mut W) -> Result<()>
where
    A: TaskGateway
        + CategoryGateway
        + NoteGateway
        + PageFetcher<Task>
        + PageFetcher<Category>
        + 'static,
    W: Write,
{
    match command {
        CliCommand::Tasks(args) => handle_tasks(api, &args, writer).await,
        CliCommand::Add(args) => handle_add(api, args, writer).await,
        CliCommand::Update(args) => handle_update(api, args, writer).await,
        CliCommand::Delete(args) => handle_delete(api, &args, writer).await,
        CliCommand::Status(args) => handle_status(api, &args, writer).await,
        CliCommand::Categories(args) => handle_categories(api, &args, writer).await,
        CliCommand::Category(args) => handle_category(api, &args, writer).await,
        CliCommand::Notes(args) => handle_notes(api, &args, writer).await,
    }
}

async fn handle_tasks<A, W>(api: Arc<A>, args: &TasksArgs, writer: &mut W) -> Result<()>
where
    A: TaskGateway + PageFetcher<Task> + 'static,
    W: Write,
{
    let mut screen = TasksScreen::new(api, InvalidationBus::new(), ToastTray::new());
    if let Some(term) = &args.search {
        let now = Instant::now();
        screen.type_search(term.clone(), now);
        screen.tick(now + DEFAULT_QUIET_PERIOD).await;
    } else {
        screen.refresh().await;
    }
    if args.page > 1 {
        screen.go_to_page(args.page).await;
    }

    let snapshot = screen.snapshot();
    screen.toasts().drain();
    if let Some(error) = &snapshot.error {
        anyhow::bail!("could not list tasks: {}", error);
    }

    write_page_header(&snapshot, "task", writer)?;
    for task in &snapshot.data {
        write_task_line(task, writer)?;
    }
    Ok(())
}

async fn handle_add<A, W>(api: Arc<A>, args: AddArgs, writer: &mut W) -> Result<()>
where
    A: TaskGateway,
    W: Write,
{
    let draft = TaskDraft {
        title: args.title,
        description: args.description,
        status: args.status.unwrap_or_default(),
        priority: args.priority.unwrap_or_default(),
        due_date: parse_due_date(args.due_date.as_deref())?,
        category_id: args.category_id,
    };
    draft.validate()?;
    let task = api.create_task(&draft).await?;
    writeln!(writer, "Created task {}", task.id)?;
    write_task_line(&task, writer)?;
    Ok(())
}

async fn handle_update<A, W>(api: Arc<A>, args: UpdateArgs, writer: &mut W) -> Result<()>
where
    A: TaskGateway,
    W: Write,
{
    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        status: args.status,
        priority: args.priority,
        due_date: parse_due_date(args.due_date.as_deref())?,
    };
    patch.validate()?;
    if patch.is_empty() {
        anyhow::bail!("nothing to update: pass at least one field flag");
    }
    let task = api.update_task(&args.id, &patch).await?;
    writeln!(writer, "Updated task {}", task.id)?;
    write_task_line(&task, writer)?;
    Ok(())
}

async fn handle_delete<A, W>(api: Arc<A>, args: &DeleteArgs, writer: &mut W) -> Result<()>
where
    A: TaskGateway,
    W: Write,
{
    let message = api.bulk_delete(&args.ids).await?;
    writeln!(writer, "{}", message.detail)?;
    Ok(())
}

async fn handle_status<A, W>(api: Arc<A>, args: &StatusArgs, writer: &mut W) -> Result<()>
where
    A: TaskGateway,
    W: Write,
{
    let message = api.bulk_set_status(&args.ids, args.status).await?;
    writeln!(writer, "{}", message.detail)?;
    Ok(())
}

async fn handle_categories<A, W>(api: Arc<A>, args: &CategoriesArgs, writer: &mut W) -> Result<()>
where
    A: CategoryGateway + PageFetcher<Category> + 'static,
    W: Write,
{
    let screen = CategoriesScreen::new(api, InvalidationBus::new(), ToastTray::new());
    screen.go_to_page(args.page).await;

    let snapshot = screen.snapshot();
    screen.toasts().drain();
    if let Some(error) = &snapshot.error {
        anyhow::bail!("could not list categories: {}", error);
    }

    write_page_header(&snapshot, "category", writer)?;
    for category in &snapshot.data {
        writeln!(
            writer,
            "{}  {}{}",
            category.id,
            category.title,
            category
                .description
                .as_deref()
                .map(|d| format!("  ({})", d))
                .unwrap_or_default()
        )?;
    }
    Ok(())
}

async fn handle_category<A, W>(api: Arc<A>, args: &CategoryArgs, writer: &mut W) -> Result<()>
where
    A: CategoryGateway,
    W: Write,
{
    let detail = api
        .fetch_category(&args.id)
        .await
        .context("could not fetch category")?;
    writeln!(writer, "{}  {}", detail.id, detail.title)?;
    if let Some(description) = &detail.description {
        writeln!(writer, "{}", description)?;
    }
    writeln!(
        writer,
        "{} task{}",
        detail.tasks.len(),
        plural(detail.tasks.len())
    )?;
    for task in &detail.tasks {
        write_task_line(task, writer)?;
    }
    Ok(())
}

async fn handle_notes<A, W>(api: Arc<A>, args: &NotesArgs, writer: &mut W) -> Result<()>
where
    A: NoteGateway,
    W: Write,
{
    let page = api
        .notes_for_task(&args.task_id)
        .await
        .context("could not fetch notes")?;
    writeln!(writer, "{} note{}", page.count, plural(page.count as usize))?;
    for note in &page.data {
        writeln!(
            writer,
            "{}  {}{}",
            note.id,
            note.title,
            note.description
                .as_deref()
                .map(|d| format!("  ({})", d))
                .unwrap_or_default()
        )?;
    }
    Ok(())
}

fn parse_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid due date '{}': expected RFC 3339", raw))?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
    }
}

fn write_page_header<T, W: Write>(
    snapshot: &ListSnapshot<T>,
    noun: &str,
    writer: &mut W,
) -> Result<()> {
    let pages = snapshot.count.div_ceil(u64::from(snapshot.per_page)).max(1);
    writeln!(
        writer,
        "Page {}/{} ({} {}{})",
        snapshot.page,
        pages,
        snapshot.count,
        noun,
        plural(snapshot.count as usize)
    )?;
    Ok(())
}

fn write_task_line<W: Write>(task: &Task, writer: &mut W) -> Result<()> {
    let due = task
        .due_date
        .map(|d| format!("  due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    let category = task
        .category_label()
        .map(|title| format!("  #{}", title))
        .unwrap_or_default();
    writeln!(
        writer,
        "{}  [{}]  ({})  {}{}{}",
        task.id, task.status, task.priority, task.title, due, category
    )?;
    Ok(())
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::TasksArgs;
    use taskdeck_core::{
        ApiError, ApiMessage, CategoryDetail, CategoryDraft, CategoryPatch, Note, NoteDraft, Page,
        TaskPriority, TaskStatus,
    };

    fn task(id: &str, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            category_id: None,
            category_title: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[derive(Default)]
    struct FakeServer {
        tasks: Mutex<Vec<Task>>,
    }

    #[async_trait]
    impl PageFetcher<Task> for FakeServer {
        async fn fetch_page(
            &self,
            skip: u32,
            limit: u32,
            search: Option<&str>,
        ) -> Result<Page<Task>, ApiError> {
            let rows: Vec<Task> = self
                .tasks
                .lock()
                .iter()
                .filter(|t| search.map(|s| t.title.contains(s)).unwrap_or(true))
                .cloned()
                .collect();
            let count = rows.len() as u64;
            let data = rows
                .into_iter()
                .skip(skip as usize)
                .take(limit as usize)
                .collect();
            Ok(Page { data, count })
        }
    }

    #[async_trait]
    impl PageFetcher<Category> for FakeServer {
        async fn fetch_page(
            &self,
            _skip: u32,
            _limit: u32,
            _search: Option<&str>,
        ) -> Result<Page<Category>, ApiError> {
            Ok(Page::empty())
        }
    }

    #[async_trait]
    impl TaskGateway for FakeServer {
        async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
            let created = task("t-new", &draft.title);
            self.tasks.lock().push(created.clone());
            Ok(created)
        }

        async fn update_task(&self, id: &str, _patch: &TaskPatch) -> Result<Task, ApiError> {
            Err(ApiError::Status {
                status: 404,
                detail: format!("Task {} not found", id),
            })
        }

        async fn delete_task(&self, _id: &str) -> Result<ApiMessage, ApiError> {
            unimplemented!("not exercised")
        }

        async fn bulk_set_status(
            &self,
            ids: &[String],
            status: TaskStatus,
        ) -> Result<ApiMessage, ApiError> {
            Ok(ApiMessage {
                detail: format!("{} tasks moved to {}", ids.len(), status),
            })
        }

        async fn bulk_delete(&self, ids: &[String]) -> Result<ApiMessage, ApiError> {
            self.tasks.lock().retain(|t| !ids.contains(&t.id));
            Ok(ApiMessage {
                detail: format!("{} tasks deleted successfully", ids.len()),
            })
        }

        async fn detach_category(&self, _id: &str) -> Result<ApiMessage, ApiError> {
            unimplemented!("not exercised")
        }
    }

    #[async_trait]
    impl CategoryGateway for FakeServer {
        async fn fetch_category(&self, id: &str) -> Result<CategoryDetail, ApiError> {
            Err(ApiError::Status {
                status: 404,
                detail: format!("Category {} not found", id),
            })
        }

        async fn create_category(&self, _draft: &CategoryDraft) -> Result<Category, ApiError> {
            unimplemented!("not exercised")
        }

        async fn update_category(
            &self,
            _id: &str,
            _patch: &CategoryPatch,
        ) -> Result<Category, ApiError> {
            unimplemented!("not exercised")
        }

        async fn delete_category(&self, _id: &str) -> Result<ApiMessage, ApiError> {
            unimplemented!("not exercised")
        }

        async fn delete_all_categories(&self) -> Result<ApiMessage, ApiError> {
            unimplemented!("not exercised")
        }
    }

    #[async_trait]
    impl NoteGateway for FakeServer {
        async fn notes_for_task(&self, task_id: &str) -> Result<Page<Note>, ApiError> {
            Ok(Page {
                data: vec![Note {
                    id: "n-1".into(),
                    title: "Remember the milk".into(),
                    description: None,
                    task_id: Some(task_id.to_string()),
                }],
                count: 1,
            })
        }

        async fn create_note(
            &self,
            _task_id: Option<&str>,
            _draft: &NoteDraft,
        ) -> Result<Note, ApiError> {
            unimplemented!("not exercised")
        }

        async fn update_note(
            &self,
            _id: &str,
            _draft: &NoteDraft,
            _task_id: Option<&str>,
        ) -> Result<Note, ApiError> {
            unimplemented!("not exercised")
        }

        async fn delete_notes(&self, _ids: &[String]) -> Result<ApiMessage, ApiError> {
            unimplemented!("not exercised")
        }
    }

    fn server_with(tasks: Vec<Task>) -> Arc<FakeServer> {
        Arc::new(FakeServer {
            tasks: Mutex::new(tasks),
        })
    }

    async fn run(api: Arc<FakeServer>, command: CliCommand) -> Result<String> {
        let mut output = Vec::new();
        dispatch(api, command, &mut output).await?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn tasks_command_lists_a_page_with_a_header() {
        let api = server_with(vec![task("a", "Water plants"), task("b", "Call bank")]);
        let output = run(
            api,
            CliCommand::Tasks(TasksArgs {
                page: 1,
                search: None,
            }),
        )
        .await
        .unwrap();

        assert!(output.starts_with("Page 1/1 (2 tasks)\n"));
        assert!(output.contains("a  [Pending]  (Medium)  Water plants"));
        assert!(output.contains("b  [Pending]  (Medium)  Call bank"));
    }

    #[tokio::test]
    async fn page_header_rounds_the_page_total_up() {
        let api = server_with(
            (1..=25)
                .map(|n| task(&format!("t{}", n), &format!("Task {:02}", n)))
                .collect(),
        );
        let output = run(
            api,
            CliCommand::Tasks(TasksArgs {
                page: 3,
                search: None,
            }),
        )
        .await
        .unwrap();

        assert!(output.starts_with("Page 3/3 (25 tasks)\n"));
    }

    #[tokio::test]
    async fn tasks_command_applies_the_search_filter() {
        let api = server_with(vec![task("a", "Water plants"), task("b", "Call bank")]);
        let output = run(
            api,
            CliCommand::Tasks(TasksArgs {
                page: 1,
                search: Some("bank".into()),
            }),
        )
        .await
        .unwrap();

        assert!(output.starts_with("Page 1/1 (1 task)\n"));
        assert!(!output.contains("Water plants"));
        assert!(output.contains("Call bank"));
    }

    #[tokio::test]
    async fn delete_command_prints_the_server_acknowledgement() {
        let api = server_with(vec![task("a", "One"), task("b", "Two")]);
        let output = run(
            api.clone(),
            CliCommand::Delete(DeleteArgs {
                ids: vec!["a".into(), "b".into()],
            }),
        )
        .await
        .unwrap();

        assert_eq!(output, "2 tasks deleted successfully\n");
        assert!(api.tasks.lock().is_empty());
    }

    #[tokio::test]
    async fn add_command_rejects_a_blank_title_before_any_request() {
        let api = server_with(Vec::new());
        let err = run(
            api.clone(),
            CliCommand::Add(AddArgs {
                title: "   ".into(),
                description: None,
                status: None,
                priority: None,
                due_date: None,
                category_id: None,
            }),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("title"));
        assert!(api.tasks.lock().is_empty());
    }

    #[tokio::test]
    async fn update_command_requires_at_least_one_field() {
        let api = server_with(Vec::new());
        let err = run(
            api,
            CliCommand::Update(UpdateArgs {
                id: "a".into(),
                title: None,
                description: None,
                status: None,
                priority: None,
                due_date: None,
            }),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("nothing to update"));
    }

    #[test]
    fn due_dates_must_be_rfc_3339() {
        assert!(parse_due_date(Some("tomorrow")).is_err());
        let parsed = parse_due_date(Some("2026-09-01T00:00:00Z")).unwrap();
        assert!(parsed.is_some());
    }
}
