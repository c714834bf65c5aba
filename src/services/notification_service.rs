//! Notification reads, read tracking and dispatch.
//!
//! Creating a notification is the primary path: any failure there is an
//! error. The per-recipient fan-out that follows is best-effort and reports
//! failed recipients instead of failing the whole request.

use async_trait::async_trait;
use domain::{
    CallerId, NewNotification, NewNotificationDetail, Notification, NotificationDetail,
    NotificationEntry, NotificationQuery, NotificationResponse,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::access;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{PushMessage, PushSender, UnitOfWork};
use crate::types::{PageRequest, PagedResult};

/// Outcome of a notification fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NotificationDispatch {
    pub notification_id: Uuid,
    /// Recipients that received a detail row
    pub delivered: Vec<Uuid>,
    /// Recipients whose detail row could not be stored
    pub failed: Vec<Uuid>,
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn get_notifications(
        &self,
        caller: CallerId,
        account_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PagedResult<NotificationResponse>>;

    async fn unread_count(&self, caller: CallerId, account_id: Uuid) -> AppResult<u64>;

    /// Mark every unread notification of `account_id` read.
    async fn mark_as_read(
        &self,
        caller: CallerId,
        account_id: Uuid,
    ) -> AppResult<Vec<NotificationResponse>>;

    async fn create_notification(&self, request: NewNotification)
        -> AppResult<NotificationDispatch>;

    /// Store one recipient row. Never fails: returns `false` instead.
    async fn create_notification_detail(&self, request: NewNotificationDetail) -> bool;
}

pub struct NotificationManager<U: UnitOfWork> {
    uow: Arc<U>,
    push: Arc<dyn PushSender>,
}

impl<U: UnitOfWork> NotificationManager<U> {
    pub fn new(uow: Arc<U>, push: Arc<dyn PushSender>) -> Self {
        Self { uow, push }
    }

    async fn mark_entries_read(&self, entries: &mut [NotificationEntry]) -> AppResult<()> {
        let details = self.uow.notification_details();
        let notifications = self.uow.notifications();
        let now = chrono::Utc::now();

        for entry in entries.iter_mut() {
            entry.mark_read(now);
            details.update(&entry.detail).await?;
            notifications.update(&entry.notification).await?;
        }
        self.uow.save().await
    }

    async fn store_notification(&self, notification: &Notification) -> AppResult<Notification> {
        let saved = self.uow.notifications().insert(notification).await?;
        self.uow.save().await?;
        Ok(saved)
    }

    async fn store_detail(&self, detail: &NotificationDetail) -> AppResult<()> {
        self.uow.notification_details().insert(detail).await?;
        self.uow.save().await
    }

    async fn rollback_quietly(&self) {
        if let Err(e) = self.uow.rollback_transaction().await {
            tracing::warn!(error = %e.detail(), "Rollback failed");
        }
    }
}

fn ensure_present(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(format!("Notification {} is required", field)));
    }
    Ok(())
}

/// Recipients in request order, each once.
fn distinct(recipients: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    recipients.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[async_trait]
impl<U: UnitOfWork> NotificationService for NotificationManager<U> {
    async fn get_notifications(
        &self,
        caller: CallerId,
        account_id: Uuid,
        page: PageRequest,
    ) -> AppResult<PagedResult<NotificationResponse>> {
        let window = page.window()?;
        access::ensure_self(caller, account_id)?;

        let query = NotificationQuery::for_account(account_id);
        let details = self.uow.notification_details();
        let total = details.count(&query).await?;
        let entries = details
            .fetch(&query, Some(window))
            .await?
            .ok_or_not_found("Notification")?;

        let items = entries
            .into_iter()
            .map(NotificationResponse::from)
            .collect();
        Ok(PagedResult::new(items, total, window))
    }

    async fn unread_count(&self, caller: CallerId, account_id: Uuid) -> AppResult<u64> {
        access::ensure_self(caller, account_id)?;
        self.uow
            .notification_details()
            .count(&NotificationQuery::unread_for(account_id))
            .await
    }

    async fn mark_as_read(
        &self,
        caller: CallerId,
        account_id: Uuid,
    ) -> AppResult<Vec<NotificationResponse>> {
        access::ensure_self(caller, account_id)?;

        let mut entries = self
            .uow
            .notification_details()
            .fetch(&NotificationQuery::unread_for(account_id), None)
            .await?
            .ok_or_not_found("Notification")?;

        if let Err(e) = self.mark_entries_read(&mut entries).await {
            self.rollback_quietly().await;
            return Err(e);
        }

        tracing::info!(account_id = %account_id, count = entries.len(), "Notifications marked read");
        Ok(entries.into_iter().map(NotificationResponse::from).collect())
    }

    async fn create_notification(
        &self,
        request: NewNotification,
    ) -> AppResult<NotificationDispatch> {
        ensure_present(&request.title, "title")?;
        ensure_present(&request.message, "message")?;

        let notification = Notification::from(&request);
        let saved = match self.store_notification(&notification).await {
            Ok(saved) => saved,
            Err(e) => {
                self.rollback_quietly().await;
                tracing::error!(error = %e.detail(), "Failed to create notification");
                return Err(AppError::internal(format!(
                    "Failed to create notification: {}",
                    e.detail()
                )));
            }
        };

        let mut delivered = Vec::new();
        let mut failed = Vec::new();
        for account_id in distinct(request.recipients) {
            let detail = NewNotificationDetail {
                notification_id: saved.id,
                account_id,
            };
            if self.create_notification_detail(detail).await {
                delivered.push(account_id);
            } else {
                failed.push(account_id);
            }
        }

        for account_id in &delivered {
            let message = PushMessage::for_account(*account_id, &saved);
            if let Err(e) = self.push.send(&message).await {
                tracing::warn!(account_id = %account_id, error = %e.detail(), "Push delivery failed");
            }
        }

        tracing::info!(
            notification_id = %saved.id,
            delivered = delivered.len(),
            failed = failed.len(),
            "Notification dispatched"
        );

        Ok(NotificationDispatch {
            notification_id: saved.id,
            delivered,
            failed,
        })
    }

    async fn create_notification_detail(&self, request: NewNotificationDetail) -> bool {
        let detail = NotificationDetail::from(request);
        match self.store_detail(&detail).await {
            Ok(()) => true,
            Err(e) => {
                self.rollback_quietly().await;
                tracing::warn!(
                    notification_id = %request.notification_id,
                    account_id = %request.account_id,
                    error = %e.detail(),
                    "Failed to create notification detail"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockPushSender;
    use crate::services::test_support::Mocks;

    fn request(recipients: Vec<Uuid>) -> NewNotification {
        NewNotification {
            title: "Happy hour".to_string(),
            message: "Two for one until 8pm".to_string(),
            image_url: None,
            link: Some("/bars/rooftop".to_string()),
            is_public: false,
            recipients,
        }
    }

    fn unread_entry(account_id: Uuid) -> NotificationEntry {
        let notification = Notification::from(&request(vec![]));
        let detail = NotificationDetail::from(NewNotificationDetail {
            notification_id: notification.id,
            account_id,
        });
        NotificationEntry {
            detail,
            notification,
        }
    }

    fn silent_push() -> Arc<dyn PushSender> {
        let mut push = MockPushSender::new();
        push.expect_send().returning(|_| Ok(()));
        Arc::new(push)
    }

    #[tokio::test]
    async fn test_mark_as_read_updates_each_entry_and_saves_once() {
        let account_id = Uuid::new_v4();
        let entries = vec![unread_entry(account_id), unread_entry(account_id)];

        let mut mocks = Mocks::default();
        mocks
            .notification_details
            .expect_fetch()
            .withf(move |q, w| *q == NotificationQuery::unread_for(account_id) && w.is_none())
            .times(1)
            .returning(move |_, _| Ok(Some(entries.clone())));
        mocks
            .notification_details
            .expect_update()
            .withf(|d| d.is_read && d.read_at.is_some())
            .times(2)
            .returning(|d| Ok(d.clone()));
        mocks
            .notifications
            .expect_update()
            .times(2)
            .returning(|n| Ok(n.clone()));
        let uow = mocks.into_uow();

        let service = NotificationManager::new(uow.clone(), silent_push());
        let read = service
            .mark_as_read(CallerId::new(account_id), account_id)
            .await
            .unwrap();

        assert_eq!(read.len(), 2);
        assert!(read.iter().all(|r| r.is_read));
        assert_eq!(uow.saves(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_with_nothing_unread() {
        let account_id = Uuid::new_v4();
        let mut mocks = Mocks::default();
        mocks
            .notification_details
            .expect_fetch()
            .returning(|_, _| Ok(Some(vec![])));
        let uow = mocks.into_uow();

        let service = NotificationManager::new(uow.clone(), silent_push());
        let read = service
            .mark_as_read(CallerId::new(account_id), account_id)
            .await
            .unwrap();

        assert!(read.is_empty());
        assert_eq!(uow.saves(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_failure_rolls_back() {
        let account_id = Uuid::new_v4();
        let entries = vec![unread_entry(account_id), unread_entry(account_id)];

        let mut mocks = Mocks::default();
        mocks
            .notification_details
            .expect_fetch()
            .returning(move |_, _| Ok(Some(entries.clone())));
        mocks
            .notification_details
            .expect_update()
            .times(1)
            .returning(|d| Ok(d.clone()));
        mocks
            .notifications
            .expect_update()
            .times(1)
            .returning(|_| Err(AppError::internal("connection lost")));
        let uow = mocks.into_uow();

        let service = NotificationManager::new(uow.clone(), silent_push());
        let result = service
            .mark_as_read(CallerId::new(account_id), account_id)
            .await;

        assert!(matches!(result, Err(AppError::InternalServerError(_))));
        assert_eq!(uow.saves(), 0);
        assert_eq!(uow.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_for_other_account_is_rejected() {
        let uow = Mocks::default().into_uow();
        let service = NotificationManager::new(uow.clone(), silent_push());

        let result = service
            .mark_as_read(CallerId::new(Uuid::new_v4()), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::UnAuthorized(_))));
        assert_eq!(uow.saves(), 0);
    }

    #[tokio::test]
    async fn test_get_notifications_pages_newest_first() {
        let account_id = Uuid::new_v4();
        let entries = vec![unread_entry(account_id); 5];

        let mut mocks = Mocks::default();
        mocks
            .notification_details
            .expect_count()
            .withf(move |q| *q == NotificationQuery::for_account(account_id))
            .returning(|_| Ok(10));
        mocks
            .notification_details
            .expect_fetch()
            .withf(move |q, _| *q == NotificationQuery::for_account(account_id))
            .returning(move |_, _| Ok(Some(entries.clone())));

        let service = NotificationManager::new(mocks.into_uow(), silent_push());
        let page = service
            .get_notifications(CallerId::new(account_id), account_id, PageRequest::new(1, 5))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_get_notifications_without_any_is_an_empty_page() {
        let account_id = Uuid::new_v4();
        let mut mocks = Mocks::default();
        mocks.notification_details.expect_count().returning(|_| Ok(0));
        mocks
            .notification_details
            .expect_fetch()
            .returning(|_, _| Ok(Some(vec![])));

        let service = NotificationManager::new(mocks.into_uow(), silent_push());
        let page = service
            .get_notifications(CallerId::new(account_id), account_id, PageRequest::new(1, 5))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_get_notifications_missing_parent_is_not_found() {
        let account_id = Uuid::new_v4();
        let mut mocks = Mocks::default();
        mocks.notification_details.expect_count().returning(|_| Ok(1));
        mocks
            .notification_details
            .expect_fetch()
            .returning(|_, _| Ok(None));

        let service = NotificationManager::new(mocks.into_uow(), silent_push());
        let result = service
            .get_notifications(CallerId::new(account_id), account_id, PageRequest::new(1, 5))
            .await;

        assert!(matches!(result, Err(AppError::DataNotFound(_))));
    }

    #[tokio::test]
    async fn test_unread_count() {
        let account_id = Uuid::new_v4();
        let mut mocks = Mocks::default();
        mocks
            .notification_details
            .expect_count()
            .withf(move |q| q.unread_only && q.account_id == account_id)
            .returning(|_| Ok(3));

        let service = NotificationManager::new(mocks.into_uow(), silent_push());
        let count = service
            .unread_count(CallerId::new(account_id), account_id)
            .await
            .unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_create_notification_fans_out_and_pushes() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let mut mocks = Mocks::default();
        mocks
            .notifications
            .expect_insert()
            .times(1)
            .returning(|n| Ok(n.clone()));
        mocks
            .notification_details
            .expect_insert()
            .times(2)
            .returning(|d| Ok(d.clone()));
        let uow = mocks.into_uow();

        let mut push = MockPushSender::new();
        push.expect_send()
            .withf(|m| m.title == "Happy hour")
            .times(2)
            .returning(|_| Ok(()));

        let service = NotificationManager::new(uow.clone(), Arc::new(push));
        let dispatch = service
            .create_notification(request(vec![first, second, first]))
            .await
            .unwrap();

        assert_eq!(dispatch.delivered, vec![first, second]);
        assert!(dispatch.failed.is_empty());
        // One save for the notification, one per detail
        assert_eq!(uow.saves(), 3);
    }

    #[tokio::test]
    async fn test_create_notification_insert_failure_is_internal_error() {
        let mut mocks = Mocks::default();
        mocks
            .notifications
            .expect_insert()
            .returning(|_| Err(AppError::internal("Database error: timeout")));
        let uow = mocks.into_uow();

        let service = NotificationManager::new(uow.clone(), silent_push());
        let result = service
            .create_notification(request(vec![Uuid::new_v4()]))
            .await;

        assert!(matches!(result, Err(AppError::InternalServerError(_))));
        assert_eq!(uow.saves(), 0);
    }

    #[tokio::test]
    async fn test_create_notification_requires_title() {
        let uow = Mocks::default().into_uow();
        let service = NotificationManager::new(uow.clone(), silent_push());

        let mut blank = request(vec![]);
        blank.title = "  ".to_string();
        let result = service.create_notification(blank).await;

        assert!(matches!(result, Err(AppError::InvalidData(_))));
        assert_eq!(uow.saves(), 0);
    }

    #[tokio::test]
    async fn test_push_failure_does_not_fail_dispatch() {
        let recipient = Uuid::new_v4();
        let mut mocks = Mocks::default();
        mocks.notifications.expect_insert().returning(|n| Ok(n.clone()));
        mocks
            .notification_details
            .expect_insert()
            .returning(|d| Ok(d.clone()));

        let mut push = MockPushSender::new();
        push.expect_send()
            .returning(|_| Err(AppError::internal("FCM unavailable")));

        let service = NotificationManager::new(mocks.into_uow(), Arc::new(push));
        let dispatch = service
            .create_notification(request(vec![recipient]))
            .await
            .unwrap();

        assert_eq!(dispatch.delivered, vec![recipient]);
    }

    #[tokio::test]
    async fn test_detail_insert_failure_returns_false() {
        let mut mocks = Mocks::default();
        mocks
            .notification_details
            .expect_insert()
            .returning(|_| Err(AppError::internal("constraint violated")));
        let uow = mocks.into_uow();

        let service = NotificationManager::new(uow.clone(), silent_push());
        let stored = service
            .create_notification_detail(NewNotificationDetail {
                notification_id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
            })
            .await;

        assert!(!stored);
        assert_eq!(uow.rollbacks(), 1);
        assert_eq!(uow.saves(), 0);
    }

    #[tokio::test]
    async fn test_detail_save_failure_returns_false() {
        let mut mocks = Mocks::default();
        mocks
            .notification_details
            .expect_insert()
            .returning(|d| Ok(d.clone()));
        let uow = mocks.into_failing_uow();

        let service = NotificationManager::new(uow.clone(), silent_push());
        let stored = service
            .create_notification_detail(NewNotificationDetail {
                notification_id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
            })
            .await;

        assert!(!stored);
        assert_eq!(uow.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_failed_recipient_is_reported_not_pushed() {
        let ok = Uuid::new_v4();
        let broken = Uuid::new_v4();

        let mut mocks = Mocks::default();
        mocks.notifications.expect_insert().returning(|n| Ok(n.clone()));
        mocks
            .notification_details
            .expect_insert()
            .returning(move |d| {
                if d.account_id == broken {
                    Err(AppError::internal("foreign key violation"))
                } else {
                    Ok(d.clone())
                }
            });

        let mut push = MockPushSender::new();
        push.expect_send().times(1).returning(|_| Ok(()));

        let service = NotificationManager::new(mocks.into_uow(), Arc::new(push));
        let dispatch = service
            .create_notification(request(vec![ok, broken]))
            .await
            .unwrap();

        assert_eq!(dispatch.delivered, vec![ok]);
        assert_eq!(dispatch.failed, vec![broken]);
    }
}
