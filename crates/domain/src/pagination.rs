//! Page arithmetic shared by every paginated listing

use crate::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// `ceil(matching / page_size)`; zero matches means zero pages
pub fn total_pages(matching: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    matching.div_ceil(u64::from(page_size)) as u32
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> DomainResult<Self> {
        if page == 0 || page_size == 0 {
            return Err(DomainError::InvalidPageRequest { page, page_size });
        }
        Ok(Self { page, page_size })
    }

    pub fn first(page_size: u32) -> DomainResult<Self> {
        Self::new(1, page_size)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the totals needed to render a pager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            page: request.page(),
            total_pages: total_pages(total_count, request.page_size()),
            total_count,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_total_pages_edges() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn test_offsets() {
        let third = PageRequest::new(3, 10).unwrap();
        assert_eq!(third.offset(), 20);
        assert_eq!(third.limit(), 10);
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
    }

    #[test]
    fn test_page_navigation() {
        let page: Page<u8> = Page::new(vec![1, 2, 3, 4, 5], PageRequest::new(3, 10).unwrap(), 25);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    proptest! {
        #[test]
        fn prop_pages_cover_all_items(count in 0u64..10_000, size in 1u32..200) {
            let pages = u64::from(total_pages(count, size));
            prop_assert!(pages * u64::from(size) >= count);
            if pages > 0 {
                prop_assert!((pages - 1) * u64::from(size) < count);
            }
        }
    }
}
