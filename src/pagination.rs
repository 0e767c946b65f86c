//! Offset pagination shared by every list call.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A page request after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    /// Page number below 1 becomes 1; a missing or non-positive size becomes
    /// the default and anything above the cap is capped.
    pub fn clamp(page_number: Option<i32>, page_size: Option<i32>) -> Self {
        let number = page_number.map(i64::from).unwrap_or(1).max(1);
        let size = match page_size.map(i64::from) {
            Some(s) if s > 0 => s.min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { number, size }
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }
}

/// Pagination fields of list requests.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    #[serde(default)]
    pub page_size: Option<i32>,
    #[serde(default)]
    pub page_number: Option<i32>,
}

impl PageParams {
    pub fn page(&self) -> Page {
        Page::clamp(self.page_number, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

impl PaginationInfo {
    pub fn new(total_items: i64, page: Page) -> Self {
        let total_items = total_items.max(0);
        let total_pages = ((total_items + page.size - 1) / page.size).max(1);
        Self {
            total_items,
            total_pages,
            current_page: page.number,
        }
    }
}
