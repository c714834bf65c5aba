//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{AppError, AppResult};
use domain::{CategoryResponse, NotificationResponse, PaymentHistoryResponse};

/// Page request as received from the client (1-based page index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    pub page_index: u64,
    /// Items per page (capped at 100)
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page_index: u64, page_size: u64) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Validate the request and turn it into an offset/limit window.
    pub fn window(&self) -> AppResult<PageWindow> {
        if self.page_index < 1 {
            return Err(AppError::invalid("Page index must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(AppError::invalid("Page size must be greater than 0"));
        }

        let limit = self.page_size.min(MAX_PAGE_SIZE);
        Ok(PageWindow {
            offset: (self.page_index - 1).saturating_mul(limit),
            limit,
        })
    }
}

/// Validated slice of a result set handed to repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

/// Number of pages needed to show `total` items, `page_size` at a time.
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// A page of mapped items plus the page count of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[aliases(
    PagedCategories = PagedResult<CategoryResponse>,
    PagedNotifications = PagedResult<NotificationResponse>,
    PagedPaymentHistories = PagedResult<PaymentHistoryResponse>
)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_pages: u64,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, window: PageWindow) -> Self {
        Self {
            items,
            total_pages: total_pages(total, window.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(15, 5), 3);
        assert_eq!(total_pages(11, 5), 3);
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 100), 1);
    }

    #[test]
    fn test_window_offsets() {
        let window = PageRequest::new(3, 5).window().unwrap();
        assert_eq!(window, PageWindow { offset: 10, limit: 5 });
    }

    #[test]
    fn test_page_size_is_capped() {
        let window = PageRequest::new(1, 10_000).window().unwrap();
        assert_eq!(window.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_invalid_requests_rejected() {
        assert!(matches!(
            PageRequest::new(0, 5).window(),
            Err(AppError::InvalidData(_))
        ));
        assert!(matches!(
            PageRequest::new(1, 0).window(),
            Err(AppError::InvalidData(_))
        ));
    }

    #[test]
    fn test_paged_result_counts_with_effective_limit() {
        let window = PageRequest::new(1, 5).window().unwrap();
        let page = PagedResult::new(vec![1, 2, 3, 4, 5], 15, window);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);

        let empty: PagedResult<u8> = PagedResult::new(vec![], 0, window);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
    }
}
