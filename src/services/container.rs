//! Service Container - Centralized service access.
//!
//! Each call hands out a service over a fresh `Persistence`, so every
//! request works in its own unit of work. Outbound integrations are built
//! once and shared.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::{
    AuthService, Authenticator, CategoryManager, CategoryService, NotificationManager,
    NotificationService, PaymentHistoryManager, PaymentHistoryService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{
    EmailSender, FcmPushSender, GoogleTokenInfoVerifier, GoogleTokenVerifier, InMemoryOtpStore,
    JobEmailSender, OtpIssuer, Persistence, PushSender,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn notifications(&self) -> Arc<dyn NotificationService>;

    fn payment_histories(&self) -> Arc<dyn PaymentHistoryService>;
}

/// Outbound collaborators shared by all requests.
#[derive(Clone)]
pub struct Integrations {
    pub push: Arc<dyn PushSender>,
    pub mailer: Arc<dyn EmailSender>,
    pub otp: Arc<dyn OtpIssuer>,
    pub google: Arc<dyn GoogleTokenVerifier>,
}

impl Integrations {
    /// Production integrations. Connects the e-mail job storage.
    pub async fn from_config(config: &Config) -> AppResult<Self> {
        let mailer = JobEmailSender::connect(config).await?;
        Ok(Self {
            push: Arc::new(FcmPushSender::new(config)),
            mailer: Arc::new(mailer),
            otp: Arc::new(InMemoryOtpStore::new(config.otp.ttl_minutes)),
            google: Arc::new(GoogleTokenInfoVerifier::new(config)),
        })
    }
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    db: DatabaseConnection,
    config: Config,
    integrations: Integrations,
}

impl Services {
    pub fn new(db: DatabaseConnection, config: Config, integrations: Integrations) -> Self {
        Self {
            db,
            config,
            integrations,
        }
    }

    fn unit_of_work(&self) -> Arc<Persistence> {
        Arc::new(Persistence::new(self.db.clone()))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        Arc::new(Authenticator::new(
            self.unit_of_work(),
            self.config.clone(),
            self.integrations.otp.clone(),
            self.integrations.mailer.clone(),
            self.integrations.google.clone(),
        ))
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        Arc::new(CategoryManager::new(self.unit_of_work()))
    }

    fn notifications(&self) -> Arc<dyn NotificationService> {
        Arc::new(NotificationManager::new(
            self.unit_of_work(),
            self.integrations.push.clone(),
        ))
    }

    fn payment_histories(&self) -> Arc<dyn PaymentHistoryService> {
        Arc::new(PaymentHistoryManager::new(self.unit_of_work()))
    }
}
