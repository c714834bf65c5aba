//! Email background job.
//!
//! No mail transport is wired in; the worker logs every message it
//! processes, which is what development and the OTP flow need.

use serde::{Deserialize, Serialize};

use crate::config::JOB_NAME_EMAIL;
use crate::errors::AppError;

/// Email job payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    pub subject: String,
    /// Plain text body
    pub body: String,
    /// Sender override (defaults to MAIL_FROM)
    #[serde(default)]
    pub from: Option<String>,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            from: None,
        }
    }

    /// Set custom sender address
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

/// Email job handler - processes email sending jobs
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    if job.to.trim().is_empty() {
        return Err(AppError::invalid("Email job without recipient"));
    }

    let from = job.from.as_deref().unwrap_or("-");
    tracing::info!(
        job = JOB_NAME_EMAIL,
        to = %job.to,
        from = %from,
        subject = %job.subject,
        "Processing email job"
    );
    tracing::debug!(to = %job.to, body = %job.body, "Email body");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_sender() {
        let job = EmailJob::new("guest@example.com", "Code", "123456").with_from("bar@example.com");
        assert_eq!(job.from.as_deref(), Some("bar@example.com"));
    }

    #[tokio::test]
    async fn test_handler_rejects_missing_recipient() {
        let result = email_job_handler(EmailJob::new(" ", "Code", "123456")).await;
        assert!(matches!(result, Err(AppError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_handler_accepts_job() {
        let result = email_job_handler(EmailJob::new("guest@example.com", "Code", "123456")).await;
        assert!(result.is_ok());
    }
}
