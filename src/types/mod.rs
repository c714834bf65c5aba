//! Shared types for list endpoints and response envelopes.

mod pagination;
mod response;

pub use pagination::{
    total_pages, PageRequest, PageWindow, PagedCategories, PagedNotifications,
    PagedPaymentHistories, PagedResult,
};
pub use response::{ApiResponse, Created, NoContent};
