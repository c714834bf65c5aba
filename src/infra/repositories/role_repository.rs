//! Role lookup table.

use async_trait::async_trait;
use domain::{Role, RoleRecord};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;

use super::base::Repository;
use super::entities::role;
use crate::errors::AppResult;
use crate::infra::unit_of_work::WorkScope;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_role(&self, role: Role) -> AppResult<Option<RoleRecord>>;
}

pub struct RoleStore {
    roles: Repository<role::Entity>,
}

impl RoleStore {
    pub fn new(scope: Arc<WorkScope>) -> Self {
        Self {
            roles: Repository::new(scope),
        }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_role(&self, role: Role) -> AppResult<Option<RoleRecord>> {
        let model = self
            .roles
            .one(role::Entity::find().filter(role::Column::Name.eq(role.as_str())))
            .await?;
        Ok(model.and_then(role::Model::into_record))
    }
}
