//! Generic repository over one SeaORM entity.
//!
//! Concrete stores build their queries and hand them to a `Repository<E>`,
//! which runs them inside the caller's unit of work.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QuerySelect, Select,
};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::AppResult;
use crate::infra::unit_of_work::{with_conn, WorkScope};
use crate::types::PageWindow;

pub struct Repository<E> {
    scope: Arc<WorkScope>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Repository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    pub fn new(scope: Arc<WorkScope>) -> Self {
        Self {
            scope,
            _entity: PhantomData,
        }
    }

    pub async fn one(&self, select: Select<E>) -> AppResult<Option<E::Model>> {
        Ok(with_conn!(self.scope, |conn| select.one(conn))?)
    }

    pub async fn all(&self, select: Select<E>) -> AppResult<Vec<E::Model>> {
        Ok(with_conn!(self.scope, |conn| select.all(conn))?)
    }

    /// Fetch one page of `select`, or everything when no window is given.
    pub async fn window(
        &self,
        select: Select<E>,
        window: Option<PageWindow>,
    ) -> AppResult<Vec<E::Model>> {
        let select = match window {
            Some(w) => select.offset(w.offset).limit(w.limit),
            None => select,
        };
        self.all(select).await
    }

    pub async fn count(&self, select: Select<E>) -> AppResult<u64> {
        Ok(with_conn!(self.scope, |conn| select.count(conn))?)
    }

    pub async fn insert<A>(&self, model: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let txn = self.scope.writer().await?;
        Ok(model.insert(&*txn).await?)
    }

    pub async fn update<A>(&self, model: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        let txn = self.scope.writer().await?;
        Ok(model.update(&*txn).await?)
    }
}
