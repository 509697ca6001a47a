//! Pagination query parameters.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts to store offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 25
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if `page` is 0 or `page_size` is
    /// outside `1..=100`.
    pub fn validate_and_get_offset_limit(&self) -> Result<(i64, i64), AppError> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err(AppError::invalid_input(
                "Page must be greater than 0",
                json!({ "field": "page" }),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::invalid_input(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "field": "page_size" }),
            ));
        }

        let offset = (page as i64 - 1) * page_size as i64;
        let limit = page_size as i64;

        Ok((offset, limit))
    }
}

/// Pagination block echoed in list responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: i64) -> Self {
        let total_pages = (total_items.max(0) as u64).div_ceil(page_size.max(1) as u64) as u32;

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
