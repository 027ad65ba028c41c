//! Traits the remote API client implements. The core never speaks HTTP
//! itself; screens and stores are generic over these so tests can run
//! against in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{
    ApiMessage, Category, CategoryDetail, CategoryDraft, CategoryPatch, Note, NoteDraft, Page,
    Task, TaskDraft, TaskPatch, TaskStatus,
};

/// One page of records for a list view. `skip`/`limit` follow the server's
/// offset pagination; `search` filters by title/description when set.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(
        &self,
        skip: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<Page<T>, ApiError>;
}

#[async_trait]
impl<T, F> PageFetcher<T> for Arc<F>
where
    F: PageFetcher<T> + ?Sized,
    T: 'static,
{
    async fn fetch_page(
        &self,
        skip: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<Page<T>, ApiError> {
        (**self).fetch_page(skip, limit, search).await
    }
}

#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError>;
    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: &str) -> Result<ApiMessage, ApiError>;
    /// One request updating every id to the same status.
    async fn bulk_set_status(
        &self,
        ids: &[String],
        status: TaskStatus,
    ) -> Result<ApiMessage, ApiError>;
    /// One request deleting every id.
    async fn bulk_delete(&self, ids: &[String]) -> Result<ApiMessage, ApiError>;
    /// Unlink the task from its category without touching either record.
    async fn detach_category(&self, id: &str) -> Result<ApiMessage, ApiError>;
}

#[async_trait]
pub trait CategoryGateway: Send + Sync {
    async fn fetch_category(&self, id: &str) -> Result<CategoryDetail, ApiError>;
    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError>;
    async fn update_category(&self, id: &str, patch: &CategoryPatch) -> Result<Category, ApiError>;
    async fn delete_category(&self, id: &str) -> Result<ApiMessage, ApiError>;
    async fn delete_all_categories(&self) -> Result<ApiMessage, ApiError>;
}

#[async_trait]
pub trait NoteGateway: Send + Sync {
    async fn notes_for_task(&self, task_id: &str) -> Result<Page<Note>, ApiError>;
    async fn create_note(&self, task_id: Option<&str>, draft: &NoteDraft)
        -> Result<Note, ApiError>;
    async fn update_note(
        &self,
        id: &str,
        draft: &NoteDraft,
        task_id: Option<&str>,
    ) -> Result<Note, ApiError>;
    async fn delete_notes(&self, ids: &[String]) -> Result<ApiMessage, ApiError>;
}
