//! PostgreSQL implementation of the store traits.

use cdb_postgres::model::{Company, ComputerView, NewComputer, UpdateComputer};
use cdb_postgres::query::{CompanyRepository, ComputerRepository};
use cdb_postgres::types::{ComputerFilter, ComputerSortBy, OffsetPagination};
use cdb_postgres::{PgClient, PgConn, PgError};

use super::{CompanyStore, ComputerStore};
use crate::service::ComputerDraft;
use crate::{Error, Result, TRACING_TARGET_STORE};

/// Store backed by a PostgreSQL connection pool.
///
/// Every operation checks a connection out of the pool for its own duration.
#[derive(Debug, Clone)]
pub struct PgStore {
    client: PgClient,
}

impl PgStore {
    /// Creates a store over the given client.
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    #[inline]
    pub fn client(&self) -> &PgClient {
        &self.client
    }

    async fn connection(&self, operation: &'static str) -> Result<PgConn> {
        self.client
            .get_connection()
            .await
            .map_err(store_error(operation))
    }
}

/// Converts a database error of the named operation into a service error.
///
/// Known constraint violations are expected outcomes of user input and are
/// only logged at debug level. Everything else is logged as an error.
fn store_error(operation: &'static str) -> impl FnOnce(PgError) -> Error {
    move |error| {
        let constraint = error.constraint_violation();
        match constraint {
            Some(constraint) => tracing::debug!(
                target: TRACING_TARGET_STORE,
                operation,
                constraint = %constraint,
                "Constraint violation",
            ),
            None => tracing::error!(
                target: TRACING_TARGET_STORE,
                operation,
                error = %error,
                transient = error.is_transient(),
                "Store operation failed",
            ),
        }

        Error::store(operation, error.to_string())
            .with_constraint(constraint)
            .with_source(error)
    }
}

#[async_trait::async_trait]
impl ComputerStore for PgStore {
    #[tracing::instrument(skip_all, fields(searching = !filter.is_empty()))]
    async fn count(&self, filter: &ComputerFilter) -> Result<i64> {
        const OPERATION: &str = "count_computers";
        let mut conn = self.connection(OPERATION).await?;
        conn.count_computers(filter)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(
        skip_all,
        fields(
            searching = !filter.is_empty(),
            sort = %sort_by.field,
            order = %sort_by.order,
            limit = pagination.limit,
            offset = pagination.offset,
        )
    )]
    async fn fetch_page(
        &self,
        filter: &ComputerFilter,
        sort_by: ComputerSortBy,
        pagination: OffsetPagination,
    ) -> Result<Vec<ComputerView>> {
        const OPERATION: &str = "fetch_computer_page";
        let mut conn = self.connection(OPERATION).await?;
        conn.offset_list_computers(filter, sort_by, pagination)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(skip_all)]
    async fn insert(&self, computer: &ComputerDraft) -> Result<i64> {
        const OPERATION: &str = "insert_computer";
        let new_computer = NewComputer::new(
            computer.name.clone(),
            computer.introduced,
            computer.discontinued,
            computer.company_id,
        );

        let mut conn = self.connection(OPERATION).await?;
        let computer = conn
            .create_computer(new_computer)
            .await
            .map_err(store_error(OPERATION))?;
        Ok(computer.id)
    }

    #[tracing::instrument(skip_all, fields(computer_id = id))]
    async fn update(&self, id: i64, computer: &ComputerDraft) -> Result<bool> {
        const OPERATION: &str = "update_computer";
        let changes = UpdateComputer::new(
            computer.name.clone(),
            computer.introduced,
            computer.discontinued,
            computer.company_id,
        );

        let mut conn = self.connection(OPERATION).await?;
        let updated = conn
            .update_computer(id, changes)
            .await
            .map_err(store_error(OPERATION))?;
        Ok(updated.is_some())
    }

    #[tracing::instrument(skip_all, fields(computer_id = id))]
    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        const OPERATION: &str = "delete_computer";
        let mut conn = self.connection(OPERATION).await?;
        conn.delete_computer(id)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(skip_all, fields(count = ids.len()))]
    async fn delete_by_ids(&self, ids: &[i64]) -> Result<usize> {
        const OPERATION: &str = "delete_computers";
        let mut conn = self.connection(OPERATION).await?;
        conn.delete_computers(ids)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(skip_all, fields(company_id = company_id))]
    async fn delete_by_company_id(&self, company_id: i64) -> Result<usize> {
        const OPERATION: &str = "delete_company_computers";
        let mut conn = self.connection(OPERATION).await?;
        conn.delete_company_computers(company_id)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(skip_all, fields(computer_id = id))]
    async fn get_by_id(&self, id: i64) -> Result<Option<ComputerView>> {
        const OPERATION: &str = "get_computer";
        let mut conn = self.connection(OPERATION).await?;
        conn.find_computer_by_id(id)
            .await
            .map_err(store_error(OPERATION))
    }
}

#[async_trait::async_trait]
impl CompanyStore for PgStore {
    #[tracing::instrument(skip_all, fields(company_id = id))]
    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        const OPERATION: &str = "company_exists";
        let mut conn = self.connection(OPERATION).await?;
        conn.company_exists(id)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(skip_all, fields(company_id = id))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Company>> {
        const OPERATION: &str = "get_company";
        let mut conn = self.connection(OPERATION).await?;
        conn.find_company_by_id(id)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(skip_all)]
    async fn count(&self) -> Result<i64> {
        const OPERATION: &str = "count_companies";
        let mut conn = self.connection(OPERATION).await?;
        conn.count_companies()
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(
        skip_all,
        fields(limit = pagination.limit, offset = pagination.offset)
    )]
    async fn fetch_page(&self, pagination: OffsetPagination) -> Result<Vec<Company>> {
        const OPERATION: &str = "fetch_company_page";
        let mut conn = self.connection(OPERATION).await?;
        conn.offset_list_companies(pagination)
            .await
            .map_err(store_error(OPERATION))
    }

    #[tracing::instrument(skip_all, fields(company_id = id))]
    async fn delete_with_computers(&self, id: i64) -> Result<bool> {
        const OPERATION: &str = "delete_company";
        let mut conn = self.connection(OPERATION).await?;

        conn.transaction(|conn| {
            Box::pin(async move {
                let computers = conn.delete_company_computers(id).await?;
                let deleted = conn.delete_company(id).await?;

                tracing::debug!(
                    target: TRACING_TARGET_STORE,
                    company_id = id,
                    computers,
                    deleted,
                    "Company deleted with its computers",
                );

                Ok::<bool, PgError>(deleted)
            })
        })
        .await
        .map_err(store_error(OPERATION))
    }
}
