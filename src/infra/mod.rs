//! Infrastructure layer - External systems integration
//!
//! - Database connections, migrations and repositories
//! - Unit of Work for transaction management
//! - Outgoing mail (job queue) and push delivery (FCM)
//! - OTP storage and Google ID token verification

pub mod db;
pub mod google;
pub mod mail;
pub mod otp;
pub mod push;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use google::{GoogleIdentity, GoogleTokenInfoVerifier, GoogleTokenVerifier};
pub use mail::{EmailSender, JobEmailSender};
pub use otp::{InMemoryOtpStore, OtpIssuer};
pub use push::{FcmPushSender, PushMessage, PushSender};
pub use repositories::{
    AccountRepository, CategoryRepository, NotificationDetailRepository, NotificationRepository,
    PaymentHistoryRepository, RoleRepository,
};
pub use unit_of_work::{Persistence, UnitOfWork, WorkScope};

#[cfg(any(test, feature = "test-utils"))]
pub use google::MockGoogleTokenVerifier;
#[cfg(any(test, feature = "test-utils"))]
pub use mail::MockEmailSender;
#[cfg(any(test, feature = "test-utils"))]
pub use otp::MockOtpIssuer;
#[cfg(any(test, feature = "test-utils"))]
pub use push::MockPushSender;
