//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Pagination parameters, taken from the request query string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Requested page, never below 1
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Page size clamped to a sane range
    pub fn per_page(&self) -> u32 {
        self.per_page.clamp(1, 100)
    }

    /// Row offset of the first item on the requested page
    pub fn offset(&self) -> u32 {
        (self.page() - 1) * self.per_page()
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u64) -> Self {
        let per_page = pagination.per_page();
        let total_pages = total_items.div_ceil(per_page as u64) as u32;
        Self {
            page: pagination.page(),
            per_page,
            total_items,
            total_pages,
        }
    }
}
