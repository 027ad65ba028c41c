use async_trait::async_trait;
use reqwest::Method;

use taskdeck_core::{ApiError, ApiMessage, Note, NoteDraft, NoteGateway, Page};

use crate::client::ApiClient;

#[async_trait]
impl NoteGateway for ApiClient {
    async fn notes_for_task(&self, task_id: &str) -> Result<Page<Note>, ApiError> {
        let url = self.endpoint(&format!("notes/task/{}/notes", task_id))?;
        let request = self.request(Method::GET, url);
        self.send(request).await
    }

    async fn create_note(
        &self,
        task_id: Option<&str>,
        draft: &NoteDraft,
    ) -> Result<Note, ApiError> {
        let url = self.endpoint("notes/")?;
        let mut request = self.request(Method::POST, url).json(draft);
        if let Some(task_id) = task_id {
            request = request.query(&[("task_id", task_id)]);
        }
        self.send(request).await
    }

    async fn update_note(
        &self,
        id: &str,
        draft: &NoteDraft,
        task_id: Option<&str>,
    ) -> Result<Note, ApiError> {
        let url = self.endpoint(&format!("notes/{}", id))?;
        let mut request = self.request(Method::PUT, url).json(draft);
        if let Some(task_id) = task_id {
            request = request.query(&[("task_id", task_id)]);
        }
        self.send(request).await
    }

    async fn delete_notes(&self, ids: &[String]) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint("notes/")?;
        let request = self.request(Method::DELETE, url).json(&ids);
        self.send(request).await
    }
}
