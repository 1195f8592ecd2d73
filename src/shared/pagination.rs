//! Offset pagination helpers shared by listing endpoints.

use serde::{Deserialize, Serialize};

use super::error::AppError;

/// Items per page when the client does not ask for a size.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Hard upper bound on page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Page request as received from the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// 1-based page number, zero is treated as the first page.
    pub fn page(&self) -> u32 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    /// Page size clamped to `1..=MAX_PER_PAGE`.
    pub fn per_page(&self) -> u32 {
        match self.per_page {
            Some(0) | None => DEFAULT_PER_PAGE,
            Some(n) => n.min(MAX_PER_PAGE),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * self.limit()
    }

    /// Reject pages past the last one. An empty result set only has page 1.
    pub fn ensure_within(&self, total_items: i64) -> Result<(), AppError> {
        let total_pages = total_pages(total_items, self.per_page());
        if total_pages > 0 && i64::from(self.page()) > total_pages {
            return Err(AppError::Validation(format!(
                "page {} exceeds the last page {}",
                self.page(),
                total_pages
            )));
        }
        Ok(())
    }
}

fn total_pages(total_items: i64, per_page: u32) -> i64 {
    let per_page = i64::from(per_page.max(1));
    (total_items + per_page - 1) / per_page
}

/// A page of results with its position in the full set.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total_items: i64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total_items,
            total_pages: total_pages(total_items, request.per_page()),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
