//! Offset pagination for the news feed.

/// Number of posts on one feed page.
pub const FEED_PAGE_SIZE: u64 = 10;

/// Number of pages needed to show `total` items, `size` per page.
pub fn total_pages(total: u64, size: u64) -> u64 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(size)
}

/// Normalize a requested page number; anything below 1 means the first page.
pub fn page_number(requested: Option<u64>) -> u64 {
    requested.filter(|p| *p >= 1).unwrap_or(1)
}

/// Largest offset a SQL `OFFSET` clause accepts.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Rows to skip before `page`, capped at what a SQL `OFFSET` accepts.
pub fn page_offset(page: u64, size: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(size).min(MAX_OFFSET)
}

/// One page of results plus the position metadata clients page with.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u64,
    pub pages: u64,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u64, total: u64, size: u64) -> Self {
        let pages = total_pages(total, size);
        Self {
            items,
            page,
            pages,
            has_more: page < pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            pages: self.pages,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_round_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn has_more_only_before_last_page() {
        let first: Page<()> = Page::new(vec![], 1, 25, FEED_PAGE_SIZE);
        assert!(first.has_more);
        let last: Page<()> = Page::new(vec![], 3, 25, FEED_PAGE_SIZE);
        assert!(!last.has_more);
        let empty: Page<()> = Page::new(vec![], 1, 0, FEED_PAGE_SIZE);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_more);
    }

    #[test]
    fn page_number_defaults_to_one() {
        assert_eq!(page_number(None), 1);
        assert_eq!(page_number(Some(0)), 1);
        assert_eq!(page_number(Some(4)), 4);
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn offset_stays_within_sql_range() {
        assert_eq!(page_offset(u64::MAX, FEED_PAGE_SIZE), i64::MAX as u64);
        assert_eq!(page_offset(1_000_000_000_000_000_000, 10), i64::MAX as u64);
    }
}
