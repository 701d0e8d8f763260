//! Offset-based pagination for database queries.
//!
//! Pages are zero-based. [`count_pages`] and [`offset`] hold the arithmetic;
//! [`PageRequest`] and [`Page`] carry it through the listing flow.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Returns the number of pages needed to show `total_elements` items,
/// `page_size` at a time.
///
/// # Panics
///
/// Panics when `page_size` is not positive. Callers validate page sizes
/// before paginating, so reaching this is a programming error.
#[inline]
pub fn count_pages(page_size: i64, total_elements: i64) -> i64 {
    assert!(page_size > 0, "page size must be positive, got {page_size}");
    let total_elements = total_elements.max(0);
    total_elements / page_size + i64::from(total_elements % page_size != 0)
}

/// Returns the number of rows to skip to reach the zero-based `page`.
#[inline]
pub fn offset(page: i64, page_size: i64) -> i64 {
    page * page_size
}

/// Offset-based pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OffsetPagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl OffsetPagination {
    /// Creates a new pagination instance.
    #[inline]
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }
}

/// A zero-based page number together with a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Zero-based page number.
    pub page: i64,
    /// Number of items per page.
    pub page_size: i64,
}

impl PageRequest {
    /// Creates a new page request.
    #[inline]
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Returns the `LIMIT`/`OFFSET` pair selecting this page.
    #[inline]
    pub fn pagination(&self) -> OffsetPagination {
        OffsetPagination::new(self.page_size, offset(self.page, self.page_size))
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page, at most `page_size` of them.
    pub elements: Vec<T>,
    /// Zero-based number of this page.
    pub current_page: i64,
    /// Number of pages in the whole listing.
    pub total_pages: i64,
    /// Number of items across all pages.
    pub total_elements: i64,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(elements: Vec<T>, current_page: i64, total_pages: i64, total_elements: i64) -> Self {
        Self {
            elements,
            current_page,
            total_pages,
            total_elements,
        }
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            elements: self.elements.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
        }
    }

    /// Returns whether a page follows this one.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    /// Returns whether this page holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_pages_rounds_up() {
        assert_eq!(count_pages(10, 0), 0);
        assert_eq!(count_pages(10, 1), 1);
        assert_eq!(count_pages(10, 10), 1);
        assert_eq!(count_pages(10, 11), 2);
        assert_eq!(count_pages(10, 25), 3);
        assert_eq!(count_pages(1, 7), 7);
    }

    #[test]
    #[should_panic(expected = "page size must be positive")]
    fn count_pages_rejects_zero_page_size() {
        count_pages(0, 10);
    }

    #[test]
    #[should_panic(expected = "page size must be positive")]
    fn count_pages_rejects_negative_page_size() {
        count_pages(-5, 10);
    }

    #[test]
    fn offset_is_page_times_size() {
        assert_eq!(offset(0, 10), 0);
        assert_eq!(offset(2, 10), 20);
        assert_eq!(offset(3, 7), 21);
    }

    #[test]
    fn page_request_selects_rows() {
        let pagination = PageRequest::new(2, 25).pagination();
        assert_eq!(pagination.limit, 25);
        assert_eq!(pagination.offset, 50);
    }

    #[test]
    fn page_maps_elements_and_keeps_counts() {
        let page = Page::new(vec![1, 2, 3], 1, 3, 23).map(|n| n * 10);
        assert_eq!(page.elements, vec![10, 20, 30]);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 23);
        assert!(page.has_next());
    }

    #[test]
    fn page_serializes_in_camel_case() {
        let page = Page::new(vec!["a"], 0, 1, 1);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["currentPage"], 0);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalElements"], 1);
    }
}
