//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod account;
pub mod bar;
pub mod booking;
pub mod category;
pub mod notification;
pub mod notification_detail;
pub mod payment_history;
pub mod role;
