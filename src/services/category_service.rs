//! Category management. Deleted categories stay in the table with their
//! soft-delete flag set and disappear from every read.

use async_trait::async_trait;
use domain::category::normalize_name;
use domain::{Category, CategoryChanges, CategoryQuery, CategoryResponse, NewCategory};
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{PageRequest, PagedResult};

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn list(
        &self,
        query: CategoryQuery,
        page: PageRequest,
    ) -> AppResult<PagedResult<CategoryResponse>>;

    async fn get(&self, id: Uuid) -> AppResult<CategoryResponse>;

    async fn create(&self, request: NewCategory) -> AppResult<CategoryResponse>;

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<CategoryResponse>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn existing(&self, id: Uuid) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")
    }

    /// Fail when another active category already uses `name`.
    async fn ensure_name_free(&self, name: &str, except: Option<Uuid>) -> AppResult<()> {
        match self.uow.categories().find_by_name(name).await? {
            Some(other) if Some(other.id) != except => Err(AppError::exists("Category")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list(
        &self,
        query: CategoryQuery,
        page: PageRequest,
    ) -> AppResult<PagedResult<CategoryResponse>> {
        let window = page.window()?;
        let categories = self.uow.categories();

        let total = categories.count(&query).await?;
        let items = categories
            .fetch(&query, Some(window))
            .await?
            .into_iter()
            .map(CategoryResponse::from)
            .collect();

        Ok(PagedResult::new(items, total, window))
    }

    async fn get(&self, id: Uuid) -> AppResult<CategoryResponse> {
        self.existing(id).await.map(CategoryResponse::from)
    }

    async fn create(&self, request: NewCategory) -> AppResult<CategoryResponse> {
        let category = request.into_category()?;
        self.ensure_name_free(&category.name, None).await?;

        let created = self.uow.categories().insert(&category).await?;
        self.uow.save().await?;

        tracing::info!(category_id = %created.id, name = %created.name, "Category created");
        Ok(CategoryResponse::from(created))
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<CategoryResponse> {
        let mut category = self.existing(id).await?;

        if let Some(name) = changes.name {
            let name = normalize_name(&name)?;
            if name.to_lowercase() != category.name.to_lowercase() {
                self.ensure_name_free(&name, Some(id)).await?;
            }
            category.rename(name);
        }
        if let Some(description) = changes.description {
            category.describe(Some(description));
        }

        let updated = self.uow.categories().update(&category).await?;
        self.uow.save().await?;

        tracing::info!(category_id = %id, "Category updated");
        Ok(CategoryResponse::from(updated))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut category = self.existing(id).await?;
        category.soft_delete();

        self.uow.categories().update(&category).await?;
        self.uow.save().await?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
