//! Account persistence.

use async_trait::async_trait;
use domain::{Account, Role};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use uuid::Uuid;

use super::base::Repository;
use super::entities::{account, role};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::WorkScope;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Lookup by e-mail, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn insert(&self, account: &Account) -> AppResult<Account>;

    async fn update(&self, account: &Account) -> AppResult<Account>;
}

pub struct AccountStore {
    accounts: Repository<account::Entity>,
    roles: Repository<role::Entity>,
}

impl AccountStore {
    pub fn new(scope: Arc<WorkScope>) -> Self {
        Self {
            accounts: Repository::new(scope.clone()),
            roles: Repository::new(scope),
        }
    }

    async fn role_of(&self, role_id: Uuid) -> AppResult<Role> {
        self.roles
            .one(role::Entity::find_by_id(role_id))
            .await?
            .and_then(role::Model::into_record)
            .map(|record| record.role)
            .ok_or_else(|| AppError::not_found("Role"))
    }

    async fn with_role(&self, model: Option<account::Model>) -> AppResult<Option<Account>> {
        match model {
            Some(model) => {
                let role = self.role_of(model.role_id).await?;
                Ok(Some(model.into_domain(role)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let model = self.accounts.one(account::Entity::find_by_id(id)).await?;
        self.with_role(model).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let model = self
            .accounts
            .one(account::Entity::find().filter(account::Column::Email.eq(email.to_lowercase())))
            .await?;
        self.with_role(model).await
    }

    async fn insert(&self, account: &Account) -> AppResult<Account> {
        let model = self.accounts.insert(account::ActiveModel::from(account)).await?;
        Ok(model.into_domain(account.role))
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        let model = self.accounts.update(account::ActiveModel::from(account)).await?;
        Ok(model.into_domain(account.role))
    }
}
