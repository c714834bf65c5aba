//! Notification and notification detail persistence.

use async_trait::async_trait;
use domain::{Notification, NotificationDetail, NotificationEntry, NotificationQuery};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::base::Repository;
use super::entities::{notification, notification_detail};
use crate::errors::AppResult;
use crate::infra::unit_of_work::WorkScope;
use crate::types::PageWindow;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> AppResult<Notification>;

    async fn update(&self, notification: &Notification) -> AppResult<Notification>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NotificationDetailRepository: Send + Sync {
    async fn count(&self, query: &NotificationQuery) -> AppResult<u64>;

    /// Entries matching `query`, newest first.
    ///
    /// `None` when a detail references a notification that no longer exists.
    async fn fetch(
        &self,
        query: &NotificationQuery,
        window: Option<PageWindow>,
    ) -> AppResult<Option<Vec<NotificationEntry>>>;

    async fn insert(&self, detail: &NotificationDetail) -> AppResult<NotificationDetail>;

    async fn update(&self, detail: &NotificationDetail) -> AppResult<NotificationDetail>;
}

pub struct NotificationStore {
    notifications: Repository<notification::Entity>,
}

impl NotificationStore {
    pub fn new(scope: Arc<WorkScope>) -> Self {
        Self {
            notifications: Repository::new(scope),
        }
    }
}

#[async_trait]
impl NotificationRepository for NotificationStore {
    async fn insert(&self, notification: &Notification) -> AppResult<Notification> {
        let model = self
            .notifications
            .insert(notification::ActiveModel::from(notification))
            .await?;
        Ok(Notification::from(model))
    }

    async fn update(&self, notification: &Notification) -> AppResult<Notification> {
        let model = self
            .notifications
            .update(notification::ActiveModel::from(notification))
            .await?;
        Ok(Notification::from(model))
    }
}

pub struct NotificationDetailStore {
    details: Repository<notification_detail::Entity>,
    notifications: Repository<notification::Entity>,
}

impl NotificationDetailStore {
    pub fn new(scope: Arc<WorkScope>) -> Self {
        Self {
            details: Repository::new(scope.clone()),
            notifications: Repository::new(scope),
        }
    }

    fn filtered(query: &NotificationQuery) -> Select<notification_detail::Entity> {
        let select = notification_detail::Entity::find()
            .filter(notification_detail::Column::AccountId.eq(query.account_id));
        if query.unread_only {
            select.filter(notification_detail::Column::IsRead.eq(false))
        } else {
            select
        }
    }
}

#[async_trait]
impl NotificationDetailRepository for NotificationDetailStore {
    async fn count(&self, query: &NotificationQuery) -> AppResult<u64> {
        self.details.count(Self::filtered(query)).await
    }

    async fn fetch(
        &self,
        query: &NotificationQuery,
        window: Option<PageWindow>,
    ) -> AppResult<Option<Vec<NotificationEntry>>> {
        let select =
            Self::filtered(query).order_by_desc(notification_detail::Column::CreatedAt);
        let details = self.details.window(select, window).await?;
        if details.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let mut ids: Vec<Uuid> = details.iter().map(|d| d.notification_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let notifications: HashMap<Uuid, notification::Model> = self
            .notifications
            .all(notification::Entity::find().filter(notification::Column::Id.is_in(ids)))
            .await?
            .into_iter()
            .map(|n| (n.id, n))
            .collect();

        let mut entries = Vec::with_capacity(details.len());
        for detail in details {
            let Some(parent) = notifications.get(&detail.notification_id) else {
                tracing::warn!(
                    detail_id = %detail.id,
                    notification_id = %detail.notification_id,
                    "Notification detail without its notification"
                );
                return Ok(None);
            };
            entries.push(NotificationEntry {
                notification: Notification::from(parent.clone()),
                detail: NotificationDetail::from(detail),
            });
        }

        Ok(Some(entries))
    }

    async fn insert(&self, detail: &NotificationDetail) -> AppResult<NotificationDetail> {
        let model = self
            .details
            .insert(notification_detail::ActiveModel::from(detail))
            .await?;
        Ok(NotificationDetail::from(model))
    }

    async fn update(&self, detail: &NotificationDetail) -> AppResult<NotificationDetail> {
        let model = self
            .details
            .update(notification_detail::ActiveModel::from(detail))
            .await?;
        Ok(NotificationDetail::from(model))
    }
}
