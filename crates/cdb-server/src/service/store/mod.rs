//! Store collaborators of the catalog services.
//!
//! The services never talk to a database directly. They go through
//! [`ComputerStore`] and [`CompanyStore`], implemented by [`PgStore`] for
//! PostgreSQL and by `MemoryStore` for tests.

#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
mod memory;
mod postgres;

use cdb_postgres::model::{Company, ComputerView};
use cdb_postgres::types::{ComputerFilter, ComputerSortBy, OffsetPagination};

#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;
use crate::Result;
use crate::service::ComputerDraft;

/// Persistence of computers.
///
/// Every listing goes through [`count`] and [`fetch_page`] with the same
/// filter, so implementations must apply identical predicates in both.
///
/// [`count`]: ComputerStore::count
/// [`fetch_page`]: ComputerStore::fetch_page
#[async_trait::async_trait]
pub trait ComputerStore: Send + Sync {
    /// Counts the computers matching the filter.
    async fn count(&self, filter: &ComputerFilter) -> Result<i64>;

    /// Fetches one sorted page of the computers matching the filter.
    ///
    /// Computers without a company are included with no company name.
    async fn fetch_page(
        &self,
        filter: &ComputerFilter,
        sort_by: ComputerSortBy,
        pagination: OffsetPagination,
    ) -> Result<Vec<ComputerView>>;

    /// Inserts a computer and returns its generated id.
    ///
    /// The draft id is ignored.
    async fn insert(&self, computer: &ComputerDraft) -> Result<i64>;

    /// Replaces the computer with the given id.
    ///
    /// Returns `false` when no such computer exists.
    async fn update(&self, id: i64, computer: &ComputerDraft) -> Result<bool>;

    /// Deletes a computer, returning whether it existed.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// Deletes every listed computer, ignoring unknown ids.
    async fn delete_by_ids(&self, ids: &[i64]) -> Result<usize>;

    /// Deletes every computer of a company.
    async fn delete_by_company_id(&self, company_id: i64) -> Result<usize>;

    /// Finds a computer, joined with its company name, by id.
    async fn get_by_id(&self, id: i64) -> Result<Option<ComputerView>>;
}

/// Persistence of companies.
#[async_trait::async_trait]
pub trait CompanyStore: Send + Sync {
    /// Returns whether a company with the given id exists.
    async fn exists_by_id(&self, id: i64) -> Result<bool>;

    /// Finds a company by id.
    async fn get_by_id(&self, id: i64) -> Result<Option<Company>>;

    /// Counts every company.
    async fn count(&self) -> Result<i64>;

    /// Fetches one page of companies ordered by name, then by id.
    async fn fetch_page(&self, pagination: OffsetPagination) -> Result<Vec<Company>>;

    /// Deletes a company together with its computers, atomically.
    ///
    /// Returns `false` when no such company exists.
    async fn delete_with_computers(&self, id: i64) -> Result<bool>;
}
