//! Push delivery through Firebase Cloud Messaging.

use async_trait::async_trait;
use domain::Notification;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::config::{Config, PUSH_TOPIC_PREFIX};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A message addressed to one FCM topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub topic: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

impl PushMessage {
    /// Message for the topic every device of `account_id` subscribes to.
    pub fn for_account(account_id: Uuid, notification: &Notification) -> Self {
        Self {
            topic: format!("{}{}", PUSH_TOPIC_PREFIX, account_id),
            title: notification.title.clone(),
            body: notification.message.clone(),
            link: notification.link.clone(),
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, message: &PushMessage) -> AppResult<()>;
}

pub struct FcmPushSender {
    client: reqwest::Client,
    endpoint: String,
    server_key: Option<String>,
}

impl FcmPushSender {
    pub fn new(config: &Config) -> Self {
        if config.push.fcm_server_key.is_none() {
            tracing::warn!("FCM_SERVER_KEY not set, push notifications are disabled");
        }
        Self {
            client: reqwest::Client::new(),
            endpoint: config.push.endpoint.clone(),
            server_key: config.push.fcm_server_key.clone(),
        }
    }
}

#[async_trait]
impl PushSender for FcmPushSender {
    async fn send(&self, message: &PushMessage) -> AppResult<()> {
        let Some(server_key) = &self.server_key else {
            tracing::debug!(topic = %message.topic, "Push disabled, message dropped");
            return Ok(());
        };

        let payload = json!({
            "to": format!("/topics/{}", message.topic),
            "notification": {
                "title": message.title,
                "body": message.body,
                "click_action": message.link,
            },
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("key={}", server_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Push request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::internal(format!(
                "Push rejected with HTTP {}",
                response.status()
            )));
        }

        tracing::debug!(topic = %message.topic, "Push delivered");
        Ok(())
    }
}
