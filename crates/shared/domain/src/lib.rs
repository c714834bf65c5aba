//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! accounts and roles, categories, notifications and payment history, plus
//! the query descriptions the services hand to repositories.

pub mod account;
pub mod category;
pub mod constants;
pub mod error;
pub mod identity;
pub mod notification;
pub mod password;
pub mod payment;
pub mod role;

pub use account::{Account, AccountResponse, RegisterAccount};
pub use category::{Category, CategoryChanges, CategoryQuery, CategoryResponse, NewCategory};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use identity::CallerId;
pub use notification::{
    NewNotification, NewNotificationDetail, Notification, NotificationDetail, NotificationEntry,
    NotificationQuery, NotificationResponse,
};
pub use password::Password;
pub use payment::{
    BarSummary, CustomerSummary, PaymentHistory, PaymentHistoryFilter, PaymentHistoryQuery,
    PaymentHistoryRecord, PaymentHistoryResponse, PaymentScope, PaymentStatus,
};
pub use role::{Role, RoleRecord};
