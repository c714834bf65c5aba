//! Outgoing e-mail, queued as background jobs.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use apalis_sql::sqlx::postgres::PgPoolOptions;
use async_trait::async_trait;

use crate::config::{Config, JOB_POOL_MAX_CONNECTIONS};
use crate::errors::{AppError, AppResult};
use crate::jobs::EmailJob;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Enqueues every message in the apalis PostgreSQL job storage; the
/// `jobs work` worker delivers them.
pub struct JobEmailSender {
    storage: PostgresStorage<EmailJob>,
    from: String,
}

impl JobEmailSender {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(JOB_POOL_MAX_CONNECTIONS)
            .connect(&config.database.url)
            .await
            .map_err(|e| AppError::internal(format!("Failed to connect job storage: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

        Ok(Self {
            storage: PostgresStorage::new(pool),
            from: config.mail.from.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for JobEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let job = EmailJob::new(to, subject, body).with_from(self.from.as_str());

        let mut storage = self.storage.clone();
        storage
            .push(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))?;

        tracing::info!(to = %to, subject = %subject, "Email queued");
        Ok(())
    }
}
