//! Database query repositories for all principal classes and content.
//!
//! Each repository is a trait implemented on [`crate::PgConnection`] so the
//! server crate can call high-level operations on any pooled connection
//! without building SQL itself.
//!
//! # Pagination
//!
//! Listing queries use the [`Pagination`] struct to provide consistent,
//! bounded pagination across the system.

pub mod content_item;
pub mod customer;
pub mod editor;
pub mod super_admin;

pub use content_item::{ContentFilter, ContentRepository};
pub use customer::CustomerRepository;
pub use editor::EditorRepository;
use serde::{Deserialize, Serialize};
pub use super_admin::SuperAdminRepository;

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance with bounds checking.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, 500),
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    ///
    /// Page numbers are caller-supplied, so the offset computation
    /// saturates instead of overflowing.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 500);
        Self::new(page_size, (page - 1).saturating_mul(page_size))
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds_checking() {
        let pagination = Pagination::new(0, 10);
        assert_eq!(pagination.limit, 1);

        let pagination = Pagination::new(10_000, 10);
        assert_eq!(pagination.limit, 500);

        let pagination = Pagination::new(10, -5);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_from_page() {
        let pagination = Pagination::from_page(1, 20);
        assert_eq!(pagination.offset, 0);

        let pagination = Pagination::from_page(3, 10);
        assert_eq!(pagination.offset, 20);
        assert_eq!(pagination.page_number(), 3);

        let pagination = Pagination::from_page(0, 20);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_saturates_on_huge_page_numbers() {
        let pagination = Pagination::from_page(i64::MAX, 500);
        assert_eq!(pagination.limit, 500);
        assert!(pagination.offset > 0);

        let pagination = Pagination::from_page(i64::MAX, 1);
        assert_eq!(pagination.offset, i64::MAX - 1);
    }
}
