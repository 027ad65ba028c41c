use async_trait::async_trait;
use reqwest::Method;

use taskdeck_core::{
    ApiError, ApiMessage, Page, PageFetcher, Task, TaskDraft, TaskGateway, TaskPatch, TaskStatus,
};

use crate::client::{list_query, ApiClient};

/// Query pairs for the bulk status endpoint: one repeated `task_ids` key per
/// id plus the target status, all in the query string.
fn status_query(ids: &[String], status: TaskStatus) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&'static str, String)> =
        ids.iter().map(|id| ("task_ids", id.clone())).collect();
    query.push(("status", status.as_str().to_string()));
    query
}

#[async_trait]
impl PageFetcher<Task> for ApiClient {
    async fn fetch_page(
        &self,
        skip: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<Page<Task>, ApiError> {
        let url = self.endpoint("tasks/")?;
        let request = self
            .request(Method::GET, url)
            .query(&list_query(skip, limit, search));
        self.send(request).await
    }
}

#[async_trait]
impl TaskGateway for ApiClient {
    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let url = self.endpoint("tasks/")?;
        let request = self.request(Method::POST, url).json(draft);
        self.send(request).await
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError> {
        let url = self.endpoint(&format!("tasks/{}", id))?;
        let request = self.request(Method::PUT, url).json(patch);
        self.send(request).await
    }

    async fn delete_task(&self, id: &str) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(&format!("tasks/{}", id))?;
        let request = self.request(Method::DELETE, url);
        self.send(request).await
    }

    async fn bulk_set_status(
        &self,
        ids: &[String],
        status: TaskStatus,
    ) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint("tasks/status")?;
        let request = self
            .request(Method::PATCH, url)
            .query(&status_query(ids, status));
        self.send(request).await
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint("tasks/")?;
        let request = self.request(Method::DELETE, url).json(&ids);
        self.send(request).await
    }

    async fn detach_category(&self, id: &str) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(&format!("tasks/{}/categories", id))?;
        let request = self.request(Method::DELETE, url);
        self.send(request).await
    }
}
