use async_trait::async_trait;
use reqwest::Method;

use taskdeck_core::{
    ApiError, ApiMessage, Category, CategoryDetail, CategoryDraft, CategoryGateway, CategoryPatch,
    Page, PageFetcher,
};

use crate::client::{list_query, ApiClient};

#[async_trait]
impl PageFetcher<Category> for ApiClient {
    async fn fetch_page(
        &self,
        skip: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<Page<Category>, ApiError> {
        let url = self.endpoint("categories/")?;
        let request = self
            .request(Method::GET, url)
            .query(&list_query(skip, limit, search));
        self.send(request).await
    }
}

#[async_trait]
impl CategoryGateway for ApiClient {
    async fn fetch_category(&self, id: &str) -> Result<CategoryDetail, ApiError> {
        let url = self.endpoint(&format!("categories/{}", id))?;
        let request = self.request(Method::GET, url);
        self.send(request).await
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError> {
        let url = self.endpoint("categories/")?;
        let request = self.request(Method::POST, url).json(draft);
        self.send(request).await
    }

    async fn update_category(&self, id: &str, patch: &CategoryPatch) -> Result<Category, ApiError> {
        let url = self.endpoint(&format!("categories/{}", id))?;
        let request = self.request(Method::PUT, url).json(patch);
        self.send(request).await
    }

    async fn delete_category(&self, id: &str) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint(&format!("categories/{}", id))?;
        let request = self.request(Method::DELETE, url);
        self.send(request).await
    }

    async fn delete_all_categories(&self) -> Result<ApiMessage, ApiError> {
        let url = self.endpoint("categories/")?;
        let request = self.request(Method::DELETE, url);
        self.send(request).await
    }
}
