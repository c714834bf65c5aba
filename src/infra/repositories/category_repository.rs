//! Category persistence. Soft-deleted rows are invisible to every query.

use async_trait::async_trait;
use domain::{Category, CategoryQuery};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};
use std::sync::Arc;
use uuid::Uuid;

use super::base::Repository;
use super::entities::category;
use crate::errors::AppResult;
use crate::infra::unit_of_work::WorkScope;
use crate::types::PageWindow;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn count(&self, query: &CategoryQuery) -> AppResult<u64>;

    /// Categories matching `query`, ordered by name.
    async fn fetch(
        &self,
        query: &CategoryQuery,
        window: Option<PageWindow>,
    ) -> AppResult<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Active category with exactly this name, ignoring case.
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    async fn insert(&self, category: &Category) -> AppResult<Category>;

    async fn update(&self, category: &Category) -> AppResult<Category>;
}

pub struct CategoryStore {
    categories: Repository<category::Entity>,
}

impl CategoryStore {
    pub fn new(scope: Arc<WorkScope>) -> Self {
        Self {
            categories: Repository::new(scope),
        }
    }

    fn active() -> Select<category::Entity> {
        category::Entity::find().filter(category::Column::IsDeleted.eq(false))
    }

    fn filtered(query: &CategoryQuery) -> Select<category::Entity> {
        let select = Self::active();
        match &query.search {
            Some(term) => select.filter(
                Expr::expr(Func::lower(Expr::col(category::Column::Name)))
                    .like(format!("%{}%", term.to_lowercase())),
            ),
            None => select,
        }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn count(&self, query: &CategoryQuery) -> AppResult<u64> {
        self.categories.count(Self::filtered(query)).await
    }

    async fn fetch(
        &self,
        query: &CategoryQuery,
        window: Option<PageWindow>,
    ) -> AppResult<Vec<Category>> {
        let select = Self::filtered(query).order_by_asc(category::Column::Name);
        let models = self.categories.window(select, window).await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let select = Self::active().filter(category::Column::Id.eq(id));
        Ok(self.categories.one(select).await?.map(Category::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let select = Self::active().filter(
            Expr::expr(Func::lower(Expr::col(category::Column::Name))).eq(name.to_lowercase()),
        );
        Ok(self.categories.one(select).await?.map(Category::from))
    }

    async fn insert(&self, category: &Category) -> AppResult<Category> {
        let model = self
            .categories
            .insert(category::ActiveModel::from(category))
            .await?;
        Ok(Category::from(model))
    }

    async fn update(&self, category: &Category) -> AppResult<Category> {
        let model = self
            .categories
            .update(category::ActiveModel::from(category))
            .await?;
        Ok(Category::from(model))
    }
}
