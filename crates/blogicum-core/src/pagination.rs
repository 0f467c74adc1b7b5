//! Fixed-size pagination over ordered result sequences.
//!
//! Page numbers are 1-based. Out-of-range requests (including page 0) clamp
//! to the nearest valid page instead of erroring, and an empty result set
//! still counts as a single empty page.

use serde::Serialize;

/// Default number of posts per page; overridable via configuration.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A requested page window.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub number: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(number: u64, per_page: u64) -> Self {
        Self {
            number,
            per_page: per_page.max(1),
        }
    }
}

/// One page of an ordered sequence plus the metadata navigation links need.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: u64, per_page: u64, total_items: u64) -> Self {
        Self {
            items,
            number,
            per_page,
            total_items,
            total_pages: total_pages(total_items, per_page),
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Total number of pages; never zero.
pub fn total_pages(total_items: u64, per_page: u64) -> u64 {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(per_page)
    }
}

/// Clamp a requested page number into the valid range for `total_items`.
pub fn clamp_page(requested: u64, total_items: u64, per_page: u64) -> u64 {
    requested.clamp(1, total_pages(total_items, per_page))
}

/// Row offset of a (already clamped) page number.
pub fn offset(page_number: u64, per_page: u64) -> u64 {
    (page_number - 1) * per_page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(21, 10), 3);
    }

    #[test]
    fn out_of_range_pages_clamp() {
        // Past the end goes to the last page, never an error.
        assert_eq!(clamp_page(99, 25, 10), 3);
        // Page zero goes to the first page.
        assert_eq!(clamp_page(0, 25, 10), 1);
        // Empty data still has page 1.
        assert_eq!(clamp_page(5, 0, 10), 1);
    }

    #[test]
    fn offsets_are_zero_based_windows() {
        assert_eq!(offset(1, 10), 0);
        assert_eq!(offset(3, 10), 20);
    }

    #[test]
    fn page_metadata() {
        let page = Page::new(vec![1, 2, 3], 2, 3, 8);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let first: Page<i32> = Page::new(vec![], 1, 10, 0);
        assert_eq!(first.total_pages, 1);
        assert!(!first.has_next());
        assert!(!first.has_previous());
    }

    #[test]
    fn per_page_is_at_least_one() {
        let req = PageRequest::new(1, 0);
        assert_eq!(req.per_page, 1);
    }
}
