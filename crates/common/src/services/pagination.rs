//! Page/pageSize handling shared by every list endpoint

use crate::config::PaginationConfig;
use serde::Serialize;

/// A resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
}

/// `pagination` block of list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

impl PageRequest {
    /// Resolve raw query values.
    ///
    /// Missing or unparseable values fall back to page 1 and the configured
    /// default size; the page is clamped to at least 1 and the size into
    /// `1..=max_page_size`.
    pub fn from_params(page: Option<&str>, page_size: Option<&str>, config: &PaginationConfig) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1) as u64;

        let page_size = page_size
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(config.default_page_size as i64)
            .clamp(1, config.max_page_size.max(1) as i64) as u64;

        Self { page, page_size }
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn with_total(&self, total: u64) -> Pagination {
        Pagination {
            page: self.page,
            page_size: self.page_size,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> PaginationConfig {
        PaginationConfig::default()
    }

    #[test]
    fn test_defaults() {
        let req = PageRequest::from_params(None, None, &cfg());
        assert_eq!(req, PageRequest { page: 1, page_size: 20 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let req = PageRequest::from_params(Some("0"), Some("500"), &cfg());
        assert_eq!(req, PageRequest { page: 1, page_size: 50 });

        let req = PageRequest::from_params(Some("-3"), Some("0"), &cfg());
        assert_eq!(req, PageRequest { page: 1, page_size: 1 });
    }

    #[test]
    fn test_garbage_falls_back() {
        let req = PageRequest::from_params(Some("abc"), Some("x"), &cfg());
        assert_eq!(req, PageRequest { page: 1, page_size: 20 });
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::from_params(Some("3"), Some("10"), &cfg());
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
        assert_eq!(req.with_total(42).total, 42);
    }
}
