//! Repository layer - Data access abstraction
//!
//! Each repository trait is the seam the services depend on; the `*Store`
//! types implement them over SeaORM through the generic `Repository<E>`.

mod account_repository;
mod base;
pub(crate) mod entities;
mod category_repository;
mod notification_repository;
mod payment_history_repository;
mod role_repository;

pub use account_repository::{AccountRepository, AccountStore};
pub use base::Repository;
pub use category_repository::{CategoryRepository, CategoryStore};
pub use notification_repository::{
    NotificationDetailRepository, NotificationDetailStore, NotificationRepository,
    NotificationStore,
};
pub use payment_history_repository::{PaymentHistoryRepository, PaymentHistoryStore};
pub use role_repository::{RoleRepository, RoleStore};

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use notification_repository::{MockNotificationDetailRepository, MockNotificationRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use payment_history_repository::MockPaymentHistoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
