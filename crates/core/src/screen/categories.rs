use std::sync::Arc;

use crate::bus::{Entity, InvalidationBus};
use crate::error::{ApiError, InvalidDraft};
use crate::list::{ListSnapshot, ListStore};
use crate::model::{Category, CategoryDetail, CategoryDraft, CategoryPatch};
use crate::remote::{CategoryGateway, PageFetcher};
use crate::toast::ToastTray;

pub const CATEGORIES_PER_PAGE: u32 = 5;

/// The categories list view. Smaller pages than tasks, no search box, and no
/// bulk selection; otherwise the same fetch/invalidate/toast cycle.
pub struct CategoriesScreen<G> {
    gateway: Arc<G>,
    list: ListStore<Category, Arc<G>>,
    toasts: ToastTray,
    bus: InvalidationBus,
}

impl<G> CategoriesScreen<G>
where
    G: CategoryGateway + PageFetcher<Category>,
{
    pub fn new(gateway: Arc<G>, bus: InvalidationBus, toasts: ToastTray) -> Self {
        let list = ListStore::new(
            Entity::Categories,
            CATEGORIES_PER_PAGE,
            gateway.clone(),
            bus.clone(),
        );
        Self {
            gateway,
            list,
            toasts,
            bus,
        }
    }

    pub fn snapshot(&self) -> ListSnapshot<Category> {
        self.list.snapshot()
    }

    pub fn toasts(&self) -> &ToastTray {
        &self.toasts
    }

    pub async fn refresh(&self) {
        if let Err(err) = self.list.refresh().await {
            self.toasts
                .error("Error", format!("Could not load categories: {}", err));
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

    /// Single-category detail with its attached tasks. Not cached; the detail
    /// pane is opened rarely and always wants current data.
    pub async fn fetch_detail(&self, id: &str) -> Result<CategoryDetail, ApiError> {
        self.gateway.fetch_category(id).await
    }

    pub async fn create(&self, draft: CategoryDraft) -> Result<Option<Category>, InvalidDraft> {
        draft.validate()?;
        match self.gateway.create_category(&draft).await {
            Ok(category) => {
                self.toasts
                    .success("Success", "Category created successfully.");
                self.bus.invalidate(Entity::Categories);
                self.refresh().await;
                Ok(Some(category))
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not create category: {}", err));
                Ok(None)
            }
        }
    }

    pub async fn update(
        &self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, InvalidDraft> {
        patch.validate()?;
        match self.gateway.update_category(id, &patch).await {
            Ok(category) => {
                self.toasts
                    .success("Success", "Category updated successfully.");
                self.bus.invalidate(Entity::Categories);
                self.refresh().await;
                Ok(Some(category))
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not update category: {}", err));
                Ok(None)
            }
        }
    }

    /// Deleting a category detaches its tasks server-side, so the tasks cache
    /// goes stale along with the categories cache.
    pub async fn delete(&self, id: &str) {
        match self.gateway.delete_category(id).await {
            Ok(_) => {
                self.toasts
                    .success("Success", "Category deleted successfully.");
                self.bus.invalidate(Entity::Categories);
                self.bus.invalidate(Entity::Tasks);
                self.refresh().await;
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not delete category: {}", err));
            }
        }
    }

    pub async fn delete_all(&self) {
        match self.gateway.delete_all_categories().await {
            Ok(_) => {
                self.toasts
                    .success("Success", "All categories were deleted successfully.");
                self.bus.invalidate(Entity::Categories);
                self.bus.invalidate(Entity::Tasks);
                self.refresh().await;
            }
            Err(err) => {
                self.toasts
                    .error("Error", format!("Could not delete categories: {}", err));
            }
        }
    }
}
