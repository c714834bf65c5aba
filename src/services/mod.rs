//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure behind object-safe
//! traits. Every implementation is generic over `UnitOfWork`, which gives
//! it repository access and transaction control.

mod access;
mod auth_service;
mod category_service;
pub mod container;
mod notification_service;
mod payment_history_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{Integrations, ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, RegistrationResponse, TokenResponse};
pub use category_service::{CategoryManager, CategoryService};
pub use notification_service::{NotificationDispatch, NotificationManager, NotificationService};
pub use payment_history_service::{PaymentHistoryManager, PaymentHistoryService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
