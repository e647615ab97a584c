//! Paginated catalog responses

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// First page number used by the catalog (1-based)
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when a caller does not specify one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// One page of results as returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub list: Vec<T>,

    #[serde(default)]
    pub total: u64,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_size")]
    pub size: u32,

    /// Total number of pages
    #[serde(default)]
    pub pages: u32,
}

impl<T> Page<T> {
    /// Build a page the way the catalog server does, deriving `pages` from
    /// `total` and `size`.
    pub fn new(list: Vec<T>, page: u32, size: u32, total: u64) -> Self {
        let pages = if size == 0 {
            0
        } else {
            total.div_ceil(u64::from(size)) as u32
        };
        Self {
            list,
            total,
            page,
            size,
            pages,
        }
    }

    /// An empty first page
    pub fn empty(size: u32) -> Self {
        Self::new(Vec::new(), DEFAULT_PAGE, size, 0)
    }

    /// Pagination values carried by this page
    pub fn snapshot(&self) -> PaginationSnapshot {
        PaginationSnapshot {
            page: self.page,
            size: self.size,
            total: self.total,
            total_pages: self.pages,
        }
    }
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Server-authoritative pagination state of a cached listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSnapshot {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl PaginationSnapshot {
    /// Whether another page exists after the current one
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

impl Default for PaginationSnapshot {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            total: 0,
            total_pages: 0,
        }
    }
}

/// Caller-supplied paging parameters; missing values fall back per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    /// Request a specific page
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            size: None,
        }
    }

    /// Set the page size
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Resolve against fallback values
    pub fn resolve(self, page: u32, size: u32) -> (u32, u32) {
        (
            self.page.filter(|p| *p > 0).unwrap_or(page),
            self.size.filter(|s| *s > 0).unwrap_or(size),
        )
    }
}
