//! HTTP request handlers.

pub mod auth_handler;
pub mod category_handler;
pub mod notification_handler;
pub mod payment_history_handler;

pub use auth_handler::auth_routes;
pub use category_handler::category_routes;
pub use notification_handler::notification_routes;
pub use payment_history_handler::payment_history_routes;
