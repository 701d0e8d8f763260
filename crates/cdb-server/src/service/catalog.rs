//! Caller-facing catalog operations shared by every front end.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use cdb_postgres::model::{Company, ComputerView};
use cdb_postgres::types::{Page, PageRequest};

use super::listing::{ListingRequest, ListingService, check_page_bounds, check_page_request};
use super::store::{CompanyStore, ComputerStore};
use super::validation::{Clock, ComputerValidator, ValidationResult};
use super::ComputerDraft;
use crate::{Error, Result, TRACING_TARGET_CATALOG};

/// Outcome of an operation that validates its input first.
///
/// Broken business rules are an expected outcome, so they are carried here
/// instead of in an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Validated<T> {
    /// The input was valid and the operation ran.
    Valid(T),
    /// The input broke at least one rule; nothing was written.
    Invalid(ValidationResult),
}

impl<T> Validated<T> {
    /// Returns whether the operation ran.
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Converts into a `Result` with the validation errors on the error side.
    pub fn into_result(self) -> std::result::Result<T, ValidationResult> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(result) => Err(result),
        }
    }
}

fn check_id(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(Error::caller(format!("id must be positive, got {id}")));
    }
    Ok(())
}

fn computer_not_found(id: i64) -> Error {
    Error::not_found(format!("Computer {id} does not exist"))
}

fn company_not_found(id: i64) -> Error {
    Error::not_found(format!("Company {id} does not exist"))
}

/// Turns a store rejection caused by a field constraint into a validation
/// outcome, passing every other failure through.
fn store_rejection<T>(error: Error) -> Result<Validated<T>> {
    let Some(result) = error.constraint().and_then(ValidationResult::from_constraint) else {
        return Err(error);
    };

    tracing::debug!(
        target: TRACING_TARGET_CATALOG,
        invalid_fields = result.len(),
        "store rejected computer"
    );
    Ok(Validated::Invalid(result))
}

/// Catalog of computers and companies.
///
/// Validates drafts before writing them and enforces the caller contracts
/// of every operation. Clones share the same stores.
#[derive(Clone)]
pub struct Catalog {
    computers: Arc<dyn ComputerStore>,
    companies: Arc<dyn CompanyStore>,
    validator: ComputerValidator,
    listing: ListingService,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Creates a catalog over the given stores.
    pub fn new(
        computers: Arc<dyn ComputerStore>,
        companies: Arc<dyn CompanyStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            validator: ComputerValidator::new(companies.clone(), clock),
            listing: ListingService::new(computers.clone()),
            computers,
            companies,
        }
    }

    /// Returns the validator used for drafts.
    #[inline]
    pub fn validator(&self) -> &ComputerValidator {
        &self.validator
    }

    /// Lists one page of computers.
    pub async fn list_computers(&self, request: &ListingRequest) -> Result<Page<ComputerView>> {
        self.listing.list(request).await
    }

    /// Finds a computer by id.
    #[tracing::instrument(skip_all, fields(computer_id = id))]
    pub async fn get_computer(&self, id: i64) -> Result<Option<ComputerView>> {
        check_id(id)?;
        self.computers.get_by_id(id).await
    }

    /// Validates and stores a new computer, returning its id.
    #[tracing::instrument(skip_all)]
    pub async fn create_computer(&self, computer: &ComputerDraft) -> Result<Validated<i64>> {
        if let Some(id) = computer.id {
            return Err(Error::caller(format!(
                "a new computer cannot carry an id, got {id}"
            )));
        }

        let result = self.validator.validate(computer).await?;
        if !result.is_valid() {
            return Ok(Validated::Invalid(result));
        }

        match self.computers.insert(computer).await {
            Ok(id) => {
                tracing::info!(target: TRACING_TARGET_CATALOG, computer_id = id, "computer created");
                Ok(Validated::Valid(id))
            }
            Err(error) => store_rejection(error),
        }
    }

    /// Validates a computer and replaces the stored one with the same id.
    #[tracing::instrument(skip_all, fields(computer_id = computer.id))]
    pub async fn update_computer(&self, computer: &ComputerDraft) -> Result<Validated<()>> {
        let id = computer
            .id
            .ok_or_else(|| Error::caller("an updated computer must carry an id"))?;
        check_id(id)?;

        if self.computers.get_by_id(id).await?.is_none() {
            return Err(computer_not_found(id));
        }

        let result = self.validator.validate(computer).await?;
        if !result.is_valid() {
            return Ok(Validated::Invalid(result));
        }

        match self.computers.update(id, computer).await {
            Ok(true) => {
                tracing::info!(target: TRACING_TARGET_CATALOG, computer_id = id, "computer updated");
                Ok(Validated::Valid(()))
            }
            Ok(false) => Err(computer_not_found(id)),
            Err(error) => store_rejection(error),
        }
    }

    /// Deletes a computer, returning it as it was.
    #[tracing::instrument(skip_all, fields(computer_id = id))]
    pub async fn delete_computer(&self, id: i64) -> Result<ComputerView> {
        check_id(id)?;

        let computer = self
            .computers
            .get_by_id(id)
            .await?
            .ok_or_else(|| computer_not_found(id))?;

        if !self.computers.delete_by_id(id).await? {
            return Err(computer_not_found(id));
        }

        tracing::info!(target: TRACING_TARGET_CATALOG, computer_id = id, "computer deleted");
        Ok(computer)
    }

    /// Deletes every listed computer and returns how many existed.
    ///
    /// Duplicate and unknown ids are ignored.
    #[tracing::instrument(skip_all, fields(requested = ids.len()))]
    pub async fn delete_computers(&self, ids: &[i64]) -> Result<usize> {
        if ids.is_empty() {
            return Err(Error::caller("at least one computer id is required"));
        }

        let ids: BTreeSet<i64> = ids.iter().copied().collect();
        for &id in &ids {
            check_id(id)?;
        }

        let ids: Vec<i64> = ids.into_iter().collect();
        let deleted = self.computers.delete_by_ids(&ids).await?;
        tracing::info!(target: TRACING_TARGET_CATALOG, deleted, "computers deleted");
        Ok(deleted)
    }

    /// Lists one page of companies ordered by name.
    #[tracing::instrument(skip_all, fields(page = request.page, page_size = request.page_size))]
    pub async fn list_companies(&self, request: PageRequest) -> Result<Page<Company>> {
        check_page_request(request)?;

        let total_elements = self.companies.count().await?;
        let total_pages = check_page_bounds(request, total_elements)?;
        let elements = self.companies.fetch_page(request.pagination()).await?;

        Ok(Page::new(elements, request.page, total_pages, total_elements))
    }

    /// Finds a company by id.
    #[tracing::instrument(skip_all, fields(company_id = id))]
    pub async fn get_company(&self, id: i64) -> Result<Option<Company>> {
        check_id(id)?;
        self.companies.get_by_id(id).await
    }

    /// Deletes a company with all of its computers, returning the company.
    #[tracing::instrument(skip_all, fields(company_id = id))]
    pub async fn delete_company(&self, id: i64) -> Result<Company> {
        check_id(id)?;

        let company = self
            .companies
            .get_by_id(id)
            .await?
            .ok_or_else(|| company_not_found(id))?;

        if !self.companies.delete_with_computers(id).await? {
            return Err(company_not_found(id));
        }

        tracing::info!(target: TRACING_TARGET_CATALOG, company_id = id, "company deleted");
        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil;

    use super::*;
    use crate::ErrorKind;
    use crate::service::validation::{FixedClock, fields, messages};
    use crate::service::MemoryStore;

    struct Fixture {
        catalog: Catalog,
        store: MemoryStore,
        apple: Company,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let apple = store.insert_company("Apple Inc.").await;
        let clock = Arc::new(FixedClock(civil::date(2024, 6, 15)));
        let catalog = Catalog::new(Arc::new(store.clone()), Arc::new(store.clone()), clock);
        Fixture {
            catalog,
            store,
            apple,
        }
    }

    fn apple_ii(company_id: i64) -> ComputerDraft {
        ComputerDraft::new("Apple II")
            .with_introduced(Some(civil::date(1977, 4, 1)))
            .with_discontinued(Some(civil::date(1993, 10, 1)))
            .with_company_id(Some(company_id))
    }

    async fn create(catalog: &Catalog, draft: &ComputerDraft) -> i64 {
        catalog
            .create_computer(draft)
            .await
            .unwrap()
            .into_result()
            .unwrap()
    }

    #[tokio::test]
    async fn created_computers_read_back_with_their_company() {
        let Fixture { catalog, apple, .. } = fixture().await;
        let draft = ComputerDraft::new("X")
            .with_introduced(Some(civil::date(2020, 1, 1)))
            .with_discontinued(Some(civil::date(2021, 1, 1)))
            .with_company_id(Some(apple.id));

        let id = create(&catalog, &draft).await;
        let view = catalog.get_computer(id).await.unwrap().unwrap();

        assert_eq!(view.name, "X");
        assert_eq!(view.introduced(), Some(civil::date(2020, 1, 1)));
        assert_eq!(view.discontinued(), Some(civil::date(2021, 1, 1)));
        assert_eq!(view.company_id, Some(apple.id));
        assert_eq!(view.company_name.as_deref(), Some("Apple Inc."));
    }

    #[tokio::test]
    async fn creating_with_an_id_is_a_caller_error() {
        let Fixture { catalog, apple, .. } = fixture().await;

        let error = catalog
            .create_computer(&apple_ii(apple.id).with_id(7))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Caller);
    }

    #[tokio::test]
    async fn invalid_drafts_are_not_stored() {
        let Fixture { catalog, store, .. } = fixture().await;

        let outcome = catalog.create_computer(&ComputerDraft::new("")).await.unwrap();
        let Validated::Invalid(result) = outcome else {
            panic!("expected a validation failure");
        };
        assert_eq!(result.get(fields::NAME), Some(messages::NAME_REQUIRED));

        let count = ComputerStore::count(&store, &Default::default()).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn updates_require_an_existing_id() {
        let Fixture { catalog, apple, .. } = fixture().await;

        let error = catalog.update_computer(&apple_ii(apple.id)).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Caller);

        let error = catalog
            .update_computer(&apple_ii(apple.id).with_id(42))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn updates_replace_every_field() {
        let Fixture { catalog, apple, .. } = fixture().await;
        let id = create(&catalog, &apple_ii(apple.id)).await;

        let outcome = catalog
            .update_computer(&ComputerDraft::new("Apple IIe").with_id(id))
            .await
            .unwrap();
        assert!(outcome.is_valid());

        let view = catalog.get_computer(id).await.unwrap().unwrap();
        assert_eq!(view.name, "Apple IIe");
        assert_eq!(view.introduced(), None);
        assert_eq!(view.company_name, None);
    }

    #[tokio::test]
    async fn invalid_updates_leave_the_row_alone() {
        let Fixture { catalog, apple, .. } = fixture().await;
        let id = create(&catalog, &apple_ii(apple.id)).await;

        let draft = apple_ii(apple.id)
            .with_id(id)
            .with_introduced(Some(civil::date(1995, 1, 1)));
        let outcome = catalog.update_computer(&draft).await.unwrap();
        assert!(!outcome.is_valid());

        let view = catalog.get_computer(id).await.unwrap().unwrap();
        assert_eq!(view.introduced(), Some(civil::date(1977, 4, 1)));
    }

    #[tokio::test]
    async fn deleting_returns_the_computer_once() {
        let Fixture { catalog, apple, .. } = fixture().await;
        let id = create(&catalog, &apple_ii(apple.id)).await;

        let deleted = catalog.delete_computer(id).await.unwrap();
        assert_eq!(deleted.id, id);

        let error = catalog.delete_computer(id).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.message(), format!("Computer {id} does not exist"));
    }

    #[tokio::test]
    async fn bulk_delete_is_idempotent() {
        let Fixture { catalog, apple, .. } = fixture().await;
        let first = create(&catalog, &apple_ii(apple.id)).await;
        let second = create(&catalog, &ComputerDraft::new("Lisa")).await;

        let deleted = catalog
            .delete_computers(&[first, second, first, 999])
            .await
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(catalog.delete_computers(&[first, second]).await.unwrap(), 0);

        let error = catalog.delete_computers(&[]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Caller);
        let error = catalog.delete_computers(&[first, 0]).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Caller);
    }

    #[tokio::test]
    async fn deleting_a_company_deletes_its_computers() {
        let Fixture { catalog, apple, .. } = fixture().await;
        let first = create(&catalog, &apple_ii(apple.id)).await;
        let second = create(&catalog, &apple_ii(apple.id)).await;
        let orphan = create(&catalog, &ComputerDraft::new("Homebrew")).await;

        let deleted = catalog.delete_company(apple.id).await.unwrap();
        assert_eq!(deleted, apple);

        let page = catalog
            .list_computers(&ListingRequest::new(0, 10))
            .await
            .unwrap();
        let ids: Vec<_> = page.elements.iter().map(|view| view.id).collect();
        assert_eq!(ids, [orphan]);
        assert!(!ids.contains(&first) && !ids.contains(&second));

        let error = catalog.delete_company(apple.id).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn companies_are_listed_by_name() {
        let Fixture { catalog, store, .. } = fixture().await;
        store.insert_company("Acorn").await;
        store.insert_company("Zenith").await;

        let page = catalog.list_companies(PageRequest::new(0, 2)).await.unwrap();
        let names: Vec<_> = page.elements.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Acorn", "Apple Inc."]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_elements, 3);

        let error = catalog
            .list_companies(PageRequest::new(2, 2))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Caller);
    }

    #[tokio::test]
    async fn non_positive_ids_are_caller_errors() {
        let Fixture { catalog, .. } = fixture().await;

        assert_eq!(catalog.get_computer(0).await.unwrap_err().kind(), ErrorKind::Caller);
        assert_eq!(catalog.get_company(-3).await.unwrap_err().kind(), ErrorKind::Caller);
        assert_eq!(
            catalog.delete_company(0).await.unwrap_err().kind(),
            ErrorKind::Caller
        );
    }

    #[tokio::test]
    async fn store_failures_are_errors_not_empty_results() {
        let Fixture { catalog, store, .. } = fixture().await;
        store.set_unavailable(true);

        assert_eq!(catalog.get_computer(1).await.unwrap_err().kind(), ErrorKind::Store);
        let error = catalog
            .create_computer(&ComputerDraft::new("Lisa"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Store);
    }

    #[tokio::test]
    async fn foreign_key_rejections_become_field_errors() {
        let Fixture { store, apple, .. } = fixture().await;

        // Company deleted between validation and insert.
        let draft = ComputerDraft::new("Lisa").with_company_id(Some(apple.id + 1));
        let error = ComputerStore::insert(&store, &draft).await.unwrap_err();
        let outcome: Validated<i64> = store_rejection(error).unwrap();

        let Validated::Invalid(result) = outcome else {
            panic!("expected a validation failure");
        };
        assert_eq!(result.get(fields::COMPANY), Some(messages::COMPANY_UNKNOWN));
    }
}
