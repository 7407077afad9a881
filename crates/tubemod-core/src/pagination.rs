//! Page cursor and pagination metadata

use crate::config::MAX_PAGE_SIZE;
use crate::error::{Result, TubemodError};
use serde::{Deserialize, Serialize};

/// Requested page position for a comment listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    page: u32,
    page_size: u32,
}

impl PageCursor {
    /// Cursor at page 1 with the given page size
    pub fn new(page_size: u32) -> Result<Self> {
        validate_page_size(page_size)?;
        Ok(Self { page: 1, page_size })
    }

    /// Current 1-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Comments per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Move to page `n`.
    ///
    /// Only positivity is checked; a page past the end is a legal request
    /// that yields an empty listing.
    pub fn set_page(&mut self, n: u32) -> Result<()> {
        if n < 1 {
            return Err(TubemodError::Validation(
                "Page number must be at least 1".to_string(),
            ));
        }
        self.page = n;
        Ok(())
    }

    /// Move forward one page
    pub fn advance(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Move back one page. Returns false when already on page 1.
    pub fn retreat(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

pub(crate) fn validate_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(TubemodError::Validation(format!(
            "Page size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, page_size
        )));
    }
    Ok(())
}

/// Pagination metadata returned with every comment page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total comments for the video
    pub total: u64,
    /// Current 1-based page
    pub page: u32,
    /// Comments per page
    pub page_size: u32,
    /// Whether a further page exists
    pub has_next: bool,
}

impl Pagination {
    /// Build metadata with `has_next` derived from the counts
    pub fn from_counts(total: u64, page: u32, page_size: u32) -> Self {
        Self {
            total,
            page,
            page_size,
            has_next: u64::from(page) * u64::from(page_size) < total,
        }
    }

    /// Number of pages, `ceil(total / page_size)`
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    /// Check `page >= 1` and that `has_next` agrees with the counts
    pub fn is_consistent(&self) -> bool {
        self.page >= 1 && self.has_next == (u64::from(self.page) * u64::from(self.page_size) < self.total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            page_size: 10,
            has_next: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_starts_on_first_page() {
        let cursor = PageCursor::new(10).unwrap();
        assert_eq!(cursor.page(), 1);
        assert_eq!(cursor.page_size(), 10);
    }

    #[test]
    fn test_cursor_rejects_bad_page_size() {
        assert!(PageCursor::new(0).is_err());
        assert!(PageCursor::new(101).is_err());
        assert!(PageCursor::new(100).is_ok());
    }

    #[test]
    fn test_set_page_requires_positive() {
        let mut cursor = PageCursor::default();
        assert!(cursor.set_page(0).is_err());
        assert_eq!(cursor.page(), 1);

        cursor.set_page(42).unwrap();
        assert_eq!(cursor.page(), 42);
    }

    #[test]
    fn test_retreat_stops_at_first_page() {
        let mut cursor = PageCursor::default();
        assert!(!cursor.retreat());
        cursor.advance();
        assert!(cursor.retreat());
        assert_eq!(cursor.page(), 1);
    }

    #[test]
    fn test_has_next_derivation() {
        let first = Pagination::from_counts(15, 1, 10);
        assert!(first.has_next);
        assert_eq!(first.total_pages(), 2);

        let second = Pagination::from_counts(15, 2, 10);
        assert!(!second.has_next);

        let exact = Pagination::from_counts(20, 2, 10);
        assert!(!exact.has_next);

        let beyond = Pagination::from_counts(15, 7, 10);
        assert!(!beyond.has_next);
    }

    #[test]
    fn test_has_next_matches_counts_everywhere() {
        for total in 0..40u64 {
            for page_size in 1..12u32 {
                for page in 1..6u32 {
                    let p = Pagination::from_counts(total, page, page_size);
                    assert!(p.is_consistent(), "{:?}", p);
                }
            }
        }
    }

    #[test]
    fn test_inconsistent_snapshot_detected() {
        let p = Pagination {
            total: 15,
            page: 2,
            page_size: 10,
            has_next: true,
        };
        assert!(!p.is_consistent());
    }

    #[test]
    fn test_empty_total_pages() {
        assert_eq!(Pagination::default().total_pages(), 0);
    }
}
