//! Notifications and their per-recipient details.
//!
//! A `Notification` holds the message once; every recipient gets a
//! `NotificationDetail` row carrying its own read flag. `NotificationEntry`
//! is the aggregate the services work with: one detail plus the notification
//! it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification message shared by all its recipients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-recipient delivery row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDetail {
    pub id: Uuid,
    pub notification_id: Uuid,
    pub account_id: Uuid,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A recipient's view of a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEntry {
    pub detail: NotificationDetail,
    pub notification: Notification,
}

impl NotificationEntry {
    /// Mark the entry read. Both the detail and its notification are touched.
    pub fn mark_read(&mut self, at: DateTime<Utc>) {
        self.detail.is_read = true;
        self.detail.read_at = Some(at);
        self.notification.updated_at = at;
    }
}

/// Filter for a recipient's notifications; shared by the count and the page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationQuery {
    pub account_id: Uuid,
    pub unread_only: bool,
}

impl NotificationQuery {
    pub fn for_account(account_id: Uuid) -> Self {
        Self {
            account_id,
            unread_only: false,
        }
    }

    pub fn unread_for(account_id: Uuid) -> Self {
        Self {
            account_id,
            unread_only: true,
        }
    }
}

/// Notification creation input
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    /// Accounts that receive a detail row
    #[serde(default)]
    pub recipients: Vec<Uuid>,
}

impl From<&NewNotification> for Notification {
    fn from(request: &NewNotification) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            message: request.message.clone(),
            image_url: request.image_url.clone(),
            link: request.link.clone(),
            is_public: request.is_public,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Detail creation input (one recipient)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NewNotificationDetail {
    pub notification_id: Uuid,
    pub account_id: Uuid,
}

impl From<NewNotificationDetail> for NotificationDetail {
    fn from(request: NewNotificationDetail) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification_id: request.notification_id,
            account_id: request.account_id,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }
}

/// Flattened notification as seen by one recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationResponse {
    /// Detail id
    pub id: Uuid,
    pub notification_id: Uuid,
    pub account_id: Uuid,
    pub title: String,
    pub message: String,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub is_public: bool,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntry> for NotificationResponse {
    fn from(entry: NotificationEntry) -> Self {
        let NotificationEntry {
            detail,
            notification,
        } = entry;
        Self {
            id: detail.id,
            notification_id: notification.id,
            account_id: detail.account_id,
            title: notification.title,
            message: notification.message,
            image_url: notification.image_url,
            link: notification.link,
            is_public: notification.is_public,
            is_read: detail.is_read,
            read_at: detail.read_at,
            created_at: detail.created_at,
        }
    }
}
