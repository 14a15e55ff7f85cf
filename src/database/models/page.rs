use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::error::ApiError;

/// Raw `limit`/`offset`/`search` query parameters shared by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub search: Option<String>,
}

/// Validated window into a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

impl ListParams {
    /// Clamp `limit` into `[1, max_limit]` and reject negative offsets.
    pub fn page(&self, config: &PaginationConfig) -> Result<Page, ApiError> {
        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit);
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::invalid_field("offset", "must not be negative"));
        }
        Ok(Page { limit, offset })
    }

    pub fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// List envelope payload; `has_more` drives "show more" paging in clients.
#[derive(Debug, Serialize)]
pub struct Paged<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl<T: Serialize> Paged<T> {
    pub fn new(items: Vec<T>, total: i64, page: Page) -> Self {
        let has_more = page.offset + (items.len() as i64) < total;
        Self {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
            has_more,
        }
    }
}

/// Apply a page to an already filtered and ordered in-memory list.
pub fn slice_page<T: Clone>(rows: &[T], page: Page) -> Vec<T> {
    rows.iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaginationConfig {
        PaginationConfig {
            default_limit: 20,
            max_limit: 50,
        }
    }

    #[test]
    fn defaults_and_clamps() {
        let params = ListParams::default();
        assert_eq!(params.page(&config()).unwrap(), Page::new(20, 0));

        let params = ListParams { limit: Some(500), ..Default::default() };
        assert_eq!(params.page(&config()).unwrap().limit, 50);

        let params = ListParams { limit: Some(0), ..Default::default() };
        assert_eq!(params.page(&config()).unwrap().limit, 1);
    }

    #[test]
    fn negative_offset_rejected() {
        let params = ListParams { offset: Some(-1), ..Default::default() };
        assert!(params.page(&config()).is_err());
    }

    #[test]
    fn blank_search_is_absent() {
        let params = ListParams { search: Some("   ".into()), ..Default::default() };
        assert_eq!(params.search(), None);
        let params = ListParams { search: Some(" dp ".into()), ..Default::default() };
        assert_eq!(params.search().as_deref(), Some("dp"));
    }

    #[test]
    fn has_more_reflects_remaining_rows() {
        let paged = Paged::new(vec![1, 2], 5, Page::new(2, 0));
        assert!(paged.has_more);
        let paged = Paged::new(vec![5], 5, Page::new(2, 4));
        assert!(!paged.has_more);
        assert_eq!(slice_page(&[1, 2, 3, 4, 5], Page::new(2, 3)), vec![4, 5]);
    }
}
