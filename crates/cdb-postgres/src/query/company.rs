//! Company repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Company, NewCompany};
use crate::schema::companies::{self, dsl};
use crate::types::OffsetPagination;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for company database operations.
pub trait CompanyRepository {
    /// Returns whether a company with the given ID exists.
    fn company_exists(&mut self, company_id: i64) -> impl Future<Output = PgResult<bool>> + Send;

    /// Finds a company by its ID.
    fn find_company_by_id(
        &mut self,
        company_id: i64,
    ) -> impl Future<Output = PgResult<Option<Company>>> + Send;

    /// Counts every company.
    fn count_companies(&mut self) -> impl Future<Output = PgResult<i64>> + Send;

    /// Lists companies ordered by name, then by ID.
    fn offset_list_companies(
        &mut self,
        pagination: OffsetPagination,
    ) -> impl Future<Output = PgResult<Vec<Company>>> + Send;

    /// Creates a new company.
    fn create_company(
        &mut self,
        new_company: NewCompany,
    ) -> impl Future<Output = PgResult<Company>> + Send;

    /// Deletes a company, returning whether a row was removed.
    ///
    /// The foreign key cascades the delete to the computers of the company.
    fn delete_company(&mut self, company_id: i64) -> impl Future<Output = PgResult<bool>> + Send;
}

impl CompanyRepository for PgConnection {
    async fn company_exists(&mut self, company_id: i64) -> PgResult<bool> {
        let exists = diesel::select(diesel::dsl::exists(
            companies::table.filter(dsl::id.eq(company_id)),
        ))
        .get_result::<bool>(self)
        .await
        .map_err(PgError::from)?;

        Ok(exists)
    }

    async fn find_company_by_id(&mut self, company_id: i64) -> PgResult<Option<Company>> {
        let company = companies::table
            .filter(dsl::id.eq(company_id))
            .select(Company::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(company)
    }

    async fn count_companies(&mut self) -> PgResult<i64> {
        let count = companies::table
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        tracing::trace!(target: TRACING_TARGET_QUERY, count, "Counted companies");
        Ok(count)
    }

    async fn offset_list_companies(
        &mut self,
        pagination: OffsetPagination,
    ) -> PgResult<Vec<Company>> {
        let companies = companies::table
            .order((dsl::name.asc(), dsl::id.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Company::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(companies)
    }

    async fn create_company(&mut self, new_company: NewCompany) -> PgResult<Company> {
        let company = diesel::insert_into(companies::table)
            .values(&new_company)
            .returning(Company::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(company)
    }

    async fn delete_company(&mut self, company_id: i64) -> PgResult<bool> {
        let deleted = diesel::delete(companies::table.filter(dsl::id.eq(company_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
