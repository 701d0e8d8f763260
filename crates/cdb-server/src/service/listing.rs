//! Paginated, filtered and sorted computer listings.

use std::fmt;
use std::sync::Arc;

use cdb_postgres::model::ComputerView;
use cdb_postgres::types::{ComputerFilter, ComputerSortBy, Page, PageRequest, count_pages};
use serde::{Deserialize, Serialize};

use super::store::ComputerStore;
use crate::{Error, Result, TRACING_TARGET_LISTING};

/// One page of computers to list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    /// Free-text filter on computer and company names.
    pub filter: ComputerFilter,
    /// Requested page and page size.
    pub page: PageRequest,
    /// Listing order.
    pub sort_by: ComputerSortBy,
}

impl ListingRequest {
    /// Creates an unfiltered request in the default order.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            filter: ComputerFilter::default(),
            page: PageRequest::new(page, page_size),
            sort_by: ComputerSortBy::default(),
        }
    }

    /// Sets the search term. Blank terms disable filtering.
    pub fn with_search(mut self, search: impl AsRef<str>) -> Self {
        self.filter = ComputerFilter::new(search);
        self
    }

    /// Sets the listing order.
    pub fn with_sort_by(mut self, sort_by: ComputerSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Rejects requests that can never select a page.
pub(crate) fn check_page_request(request: PageRequest) -> Result<()> {
    if request.page_size <= 0 {
        return Err(Error::caller(format!(
            "page size must be positive, got {}",
            request.page_size
        )));
    }

    if request.page < 0 {
        return Err(Error::caller(format!(
            "page must not be negative, got {}",
            request.page
        )));
    }

    Ok(())
}

/// Returns the number of pages once the total is known, rejecting pages
/// past the last one.
///
/// An empty listing has no pages, but page 0 stays valid for it.
pub(crate) fn check_page_bounds(request: PageRequest, total_elements: i64) -> Result<i64> {
    let total_pages = count_pages(request.page_size, total_elements);
    let last_page = (total_pages - 1).max(0);

    if request.page > last_page {
        return Err(Error::caller(format!(
            "page {} is out of range, last page is {last_page}",
            request.page
        )));
    }

    Ok(total_pages)
}

/// Builds pages of computers out of a [`ComputerStore`].
#[derive(Clone)]
pub struct ListingService {
    computers: Arc<dyn ComputerStore>,
}

impl fmt::Debug for ListingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingService").finish_non_exhaustive()
    }
}

impl ListingService {
    /// Creates a listing service over the given store.
    pub fn new(computers: Arc<dyn ComputerStore>) -> Self {
        Self { computers }
    }

    /// Lists one page of computers.
    ///
    /// The total is counted first so that an out-of-range page is rejected
    /// before any row is fetched.
    #[tracing::instrument(
        skip_all,
        fields(
            page = request.page.page,
            page_size = request.page.page_size,
            sort = %request.sort_by.field,
            order = %request.sort_by.order,
            filtered = !request.filter.is_empty(),
        )
    )]
    pub async fn list(&self, request: &ListingRequest) -> Result<Page<ComputerView>> {
        check_page_request(request.page)?;

        let total_elements = self.computers.count(&request.filter).await?;
        let total_pages = check_page_bounds(request.page, total_elements)?;

        let elements = self
            .computers
            .fetch_page(&request.filter, request.sort_by, request.page.pagination())
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_LISTING,
            total_elements,
            total_pages,
            returned = elements.len(),
            "computers listed"
        );

        Ok(Page::new(
            elements,
            request.page.page,
            total_pages,
            total_elements,
        ))
    }
}
