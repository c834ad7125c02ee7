//! Pagination over an ordered record list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GridError;

// ---------------------------------------------------------------------------
// PageSize
// ---------------------------------------------------------------------------

/// Rows per page. Only the sizes the page-size selector offers exist.
///
/// Serializes as the bare number (`20`, `50`, `100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    /// Every selectable size, smallest first.
    pub const ALL: [PageSize; 3] = [PageSize::Twenty, PageSize::Fifty, PageSize::Hundred];

    /// Rows per page as a count.
    pub fn get(self) -> usize {
        match self {
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = GridError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            20 => Ok(Self::Twenty),
            50 => Ok(Self::Fifty),
            100 => Ok(Self::Hundred),
            other => Err(GridError::UnsupportedPageSize(other)),
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get() as u32
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// ---------------------------------------------------------------------------
// Paginator
// ---------------------------------------------------------------------------

/// A page cursor over an owned, ordered list of records.
///
/// Pages are 1-based. `total_pages` is `ceil(len / page_size)`, so an
/// empty list has zero pages and stays on page 1. Replacing the records
/// or changing the page size returns to page 1; navigation outside
/// `1..=total_pages` is ignored.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    records: Vec<T>,
    page: usize,
    page_size: PageSize,
}

impl<T> Paginator<T> {
    /// Starts on page 1 with the default page size.
    pub fn new(records: Vec<T>) -> Self {
        Self::with_page_size(records, PageSize::default())
    }

    /// Starts on page 1 with the given page size.
    pub fn with_page_size(records: Vec<T>, page_size: PageSize) -> Self {
        Self {
            records,
            page: 1,
            page_size,
        }
    }

    /// Replaces the records and returns to page 1.
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.page = 1;
    }

    /// Changes the page size and returns to page 1.
    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Moves to `page` if it exists. Returns whether the page changed
    /// or was already current.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
            true
        } else {
            tracing::trace!(page, total = self.total_pages(), "page out of range, ignored");
            false
        }
    }

    /// Advances one page if possible.
    pub fn next(&mut self) -> bool {
        self.go_to(self.page + 1)
    }

    /// Goes back one page if possible.
    pub fn prev(&mut self) -> bool {
        self.go_to(self.page.saturating_sub(1))
    }

    /// Rows on the current page.
    pub fn page_items(&self) -> &[T] {
        let size = self.page_size.get();
        let start = ((self.page - 1) * size).min(self.records.len());
        let end = (start + size).min(self.records.len());
        &self.records[start..end]
    }

    /// Current page, 1-based.
    pub fn current_page(&self) -> usize {
        self.page
    }

    /// Number of pages; zero for an empty list.
    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(self.page_size.get())
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether an earlier page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Current page size.
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// All records, in order.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Total record count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn test_page_size_try_from_accepts_only_known_sizes() {
        assert_eq!(PageSize::try_from(50), Ok(PageSize::Fifty));
        assert_eq!(PageSize::try_from(25), Err(GridError::UnsupportedPageSize(25)));
    }

    #[test]
    fn test_page_size_serializes_as_number() {
        assert_eq!(serde_json::to_string(&PageSize::Hundred).unwrap(), "100");
        let size: PageSize = serde_json::from_str("20").unwrap();
        assert_eq!(size, PageSize::Twenty);
        assert!(serde_json::from_str::<PageSize>("30").is_err());
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(Paginator::new(numbers(0)).total_pages(), 0);
        assert_eq!(Paginator::new(numbers(1)).total_pages(), 1);
        assert_eq!(Paginator::new(numbers(20)).total_pages(), 1);
        assert_eq!(Paginator::new(numbers(21)).total_pages(), 2);
        assert_eq!(Paginator::with_page_size(numbers(250), PageSize::Hundred).total_pages(), 3);
    }

    #[test]
    fn test_page_items_slices_current_page() {
        let mut p = Paginator::new(numbers(45));
        assert_eq!(p.page_items(), &numbers(20)[..]);

        assert!(p.go_to(3));
        assert_eq!(p.page_items(), &[41, 42, 43, 44, 45]);
    }

    #[test]
    fn test_go_to_out_of_range_is_ignored() {
        let mut p = Paginator::new(numbers(45));
        p.go_to(2);

        assert!(!p.go_to(0));
        assert!(!p.go_to(4));
        assert_eq!(p.current_page(), 2);
    }

    #[test]
    fn test_next_prev_clamp_at_edges() {
        let mut p = Paginator::new(numbers(30));
        assert!(!p.has_prev());
        assert!(!p.prev());

        assert!(p.next());
        assert!(!p.has_next());
        assert!(!p.next());
        assert_eq!(p.current_page(), 2);

        assert!(p.prev());
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_set_records_resets_to_first_page() {
        let mut p = Paginator::new(numbers(100));
        p.go_to(4);

        p.set_records(numbers(100));

        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_set_page_size_resets_to_first_page() {
        let mut p = Paginator::new(numbers(100));
        p.go_to(3);

        p.set_page_size(PageSize::Fifty);

        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(), 2);
        assert_eq!(p.page_items().len(), 50);
    }

    #[test]
    fn test_empty_list_stays_on_page_one() {
        let mut p: Paginator<usize> = Paginator::new(vec![]);
        assert!(p.page_items().is_empty());
        assert!(!p.next());
        assert_eq!(p.current_page(), 1);
        assert!(!p.has_next());
    }
}
