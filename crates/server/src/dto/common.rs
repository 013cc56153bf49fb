//! Shared response and query types.

use serde::{Deserialize, Serialize};

/// Generic success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessResponse {
    /// Indicates operation success
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl SuccessResponse {
    /// Creates a success response with a message.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// Pagination info included in list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// Current page (1-based)
    pub page: u64,
    /// Items per page
    pub per_page: u64,
    /// Total matching rows
    pub total: u64,
    /// Total pages
    pub total_pages: u64,
}

impl PaginationInfo {
    /// Builds pagination info from query values and a total row count.
    #[must_use]
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if total == 0 { 0 } else { total.div_ceil(per_page) };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Query parameters for paginated lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Page number (1-based, default: 1)
    pub page: Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
}

impl ListQuery {
    /// Page number, clamped to at least 1.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Items per page, clamped to 1..=100.
    #[must_use]
    pub fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }
}
