//! Computer repository and the listing query pair.
//!
//! Listings are served by two queries built from the same search predicate:
//! a count over every matching row and a sorted, limited page of them. Both
//! read from `computers LEFT JOIN companies`, so computers without a company
//! are never dropped.

use std::future::Future;

use diesel::dsl;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable};
use diesel_async::RunQueryDsl;

use crate::model::{Computer, ComputerView, NewComputer, UpdateComputer};
use crate::schema::{companies, computers};
use crate::types::{
    ComputerFilter, ComputerSortBy, ComputerSortField, OffsetPagination, SortOrder,
};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Query source shared by both listing queries.
type ListingSource = dsl::LeftJoinQuerySource<computers::table, companies::table>;

/// Search predicate over [`ListingSource`].
type SearchPredicate = Box<dyn BoxableExpression<ListingSource, Pg, SqlType = Nullable<Bool>>>;

/// Selection of a listing row: the computer and its company name.
type ListingSelection = (dsl::AsSelect<Computer, Pg>, dsl::Nullable<companies::name>);

/// Boxed count query of a listing.
pub type CountQuery<'a> = dsl::IntoBoxed<
    'a,
    dsl::Select<dsl::LeftJoin<computers::table, companies::table>, dsl::CountStar>,
    Pg,
>;

/// Boxed page query of a listing.
pub type PageQuery<'a> = dsl::IntoBoxed<
    'a,
    dsl::Select<dsl::LeftJoin<computers::table, companies::table>, ListingSelection>,
    Pg,
>;

/// Builds the count and page queries of one computer listing.
///
/// The search predicate is produced by a single function for both queries,
/// so the count always describes the rows the page query walks through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputerListing {
    filter: ComputerFilter,
    sort_by: ComputerSortBy,
}

impl ComputerListing {
    /// Creates a listing over the computers matching `filter`.
    pub fn new(filter: ComputerFilter, sort_by: ComputerSortBy) -> Self {
        Self { filter, sort_by }
    }

    /// Returns the case-insensitive substring match on computer name or
    /// company name, or `None` when the filter is empty.
    fn search_predicate(&self) -> Option<SearchPredicate> {
        let pattern = self.filter.like_pattern()?;
        let predicate = computers::name
            .ilike(pattern.clone())
            .nullable()
            .or(companies::name.nullable().ilike(pattern));
        Some(Box::new(predicate))
    }

    /// Returns the query counting every matching computer.
    pub fn count_query<'a>(&self) -> CountQuery<'a> {
        let mut query = computers::table
            .left_join(companies::table)
            .select(dsl::count_star())
            .into_boxed();

        if let Some(predicate) = self.search_predicate() {
            query = query.filter(predicate);
        }

        query
    }

    /// Returns the query fetching one sorted page of matching computers.
    pub fn page_query<'a>(&self, pagination: OffsetPagination) -> PageQuery<'a> {
        let mut query = computers::table
            .left_join(companies::table)
            .select((Computer::as_select(), companies::name.nullable()))
            .into_boxed();

        if let Some(predicate) = self.search_predicate() {
            query = query.filter(predicate);
        }

        // The primary column, then the computer name in the same direction.
        // Postgres places NULLs last ascending and first descending.
        let query = match (self.sort_by.field, self.sort_by.order) {
            (ComputerSortField::Name, SortOrder::Asc) => query.order(computers::name.asc()),
            (ComputerSortField::Name, SortOrder::Desc) => query.order(computers::name.desc()),
            (ComputerSortField::Introduced, SortOrder::Asc) => {
                query.order((computers::introduced.asc(), computers::name.asc()))
            }
            (ComputerSortField::Introduced, SortOrder::Desc) => {
                query.order((computers::introduced.desc(), computers::name.desc()))
            }
            (ComputerSortField::Discontinued, SortOrder::Asc) => {
                query.order((computers::discontinued.asc(), computers::name.asc()))
            }
            (ComputerSortField::Discontinued, SortOrder::Desc) => {
                query.order((computers::discontinued.desc(), computers::name.desc()))
            }
            (ComputerSortField::Company, SortOrder::Asc) => {
                query.order((companies::name.asc(), computers::name.asc()))
            }
            (ComputerSortField::Company, SortOrder::Desc) => {
                query.order((companies::name.desc(), computers::name.desc()))
            }
        };

        query
            .then_order_by(computers::id.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
    }
}

/// Repository for computer database operations.
pub trait ComputerRepository {
    /// Counts the computers matching the filter.
    fn count_computers(
        &mut self,
        filter: &ComputerFilter,
    ) -> impl Future<Output = PgResult<i64>> + Send;

    /// Fetches one sorted page of the computers matching the filter.
    fn offset_list_computers(
        &mut self,
        filter: &ComputerFilter,
        sort_by: ComputerSortBy,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<Vec<ComputerView>>> + Send;

    /// Finds a computer, joined with its company name, by ID.
    fn find_computer_by_id(
        &mut self,
        computer_id: i64,
    ) -> impl Future<Output = PgResult<Option<ComputerView>>> + Send;

    /// Creates a new computer.
    fn create_computer(
        &mut self,
        new_computer: NewComputer,
    ) -> impl Future<Output = PgResult<Computer>> + Send;

    /// Replaces every mutable column of a computer.
    ///
    /// Returns `None` when no computer has the given ID.
    fn update_computer(
        &mut self,
        computer_id: i64,
        changes: UpdateComputer,
    ) -> impl Future<Output = PgResult<Option<Computer>>> + Send;

    /// Deletes a computer, returning whether a row was removed.
    fn delete_computer(&mut self, computer_id: i64)
    -> impl Future<Output = PgResult<bool>> + Send;

    /// Deletes every listed computer, returning how many rows were removed.
    fn delete_computers(
        &mut self,
        computer_ids: &[i64],
    ) -> impl Future<Output = PgResult<usize>> + Send;

    /// Deletes every computer of a company, returning how many were removed.
    fn delete_company_computers(
        &mut self,
        company_id: i64,
    ) -> impl Future<Output = PgResult<usize>> + Send;
}

impl ComputerRepository for PgConnection {
    async fn count_computers(&mut self, filter: &ComputerFilter) -> PgResult<i64> {
        let listing = ComputerListing::new(filter.clone(), ComputerSortBy::default());

        let count = listing
            .count_query()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        tracing::trace!(target: TRACING_TARGET_QUERY, count, "Counted computers");
        Ok(count)
    }

    async fn offset_list_computers(
        &mut self,
        filter: &ComputerFilter,
        sort_by: ComputerSortBy,
        pagination: OffsetPagination,
    ) -> PgResult<Vec<ComputerView>> {
        let listing = ComputerListing::new(filter.clone(), sort_by);

        let rows = listing
            .page_query(pagination)
            .load::<(Computer, Option<String>)>(self)
            .await
            .map_err(PgError::from)?;

        Ok(rows.into_iter().map(ComputerView::from).collect())
    }

    async fn find_computer_by_id(&mut self, computer_id: i64) -> PgResult<Option<ComputerView>> {
        let row = computers::table
            .left_join(companies::table)
            .filter(computers::id.eq(computer_id))
            .select((Computer::as_select(), companies::name.nullable()))
            .first::<(Computer, Option<String>)>(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(row.map(ComputerView::from))
    }

    async fn create_computer(&mut self, new_computer: NewComputer) -> PgResult<Computer> {
        let computer = diesel::insert_into(computers::table)
            .values(&new_computer)
            .returning(Computer::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(computer)
    }

    async fn update_computer(
        &mut self,
        computer_id: i64,
        changes: UpdateComputer,
    ) -> PgResult<Option<Computer>> {
        let computer = diesel::update(computers::table.filter(computers::id.eq(computer_id)))
            .set(&changes)
            .returning(Computer::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(computer)
    }

    async fn delete_computer(&mut self, computer_id: i64) -> PgResult<bool> {
        let deleted = diesel::delete(computers::table.filter(computers::id.eq(computer_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn delete_computers(&mut self, computer_ids: &[i64]) -> PgResult<usize> {
        if computer_ids.is_empty() {
            return Ok(0);
        }

        let deleted = diesel::delete(computers::table.filter(computers::id.eq_any(computer_ids)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted)
    }

    async fn delete_company_computers(&mut self, company_id: i64) -> PgResult<usize> {
        let deleted =
            diesel::delete(computers::table.filter(computers::company_id.eq(company_id)))
                .execute(self)
                .await
                .map_err(PgError::from)?;

        Ok(deleted)
    }
}
