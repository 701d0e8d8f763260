//! In-memory implementation of the store traits.
//!
//! Mirrors the PostgreSQL behavior closely enough for service and handler
//! tests: the same search semantics, left-join visibility of computers
//! without a company, composite ordering, schema constraints and cascading
//! company deletion.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use cdb_postgres::model::{Company, Computer, ComputerView};
use cdb_postgres::types::{
    ComputerConstraints, ComputerFilter, ComputerSortBy, ComputerSortField, ConstraintViolation,
    OffsetPagination, SortOrder,
};
use jiff::civil;
use tokio::sync::RwLock;

use super::{CompanyStore, ComputerStore};
use crate::service::ComputerDraft;
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct ComputerRow {
    name: String,
    introduced: Option<civil::Date>,
    discontinued: Option<civil::Date>,
    company_id: Option<i64>,
}

#[derive(Debug, Default)]
struct Tables {
    companies: BTreeMap<i64, String>,
    computers: BTreeMap<i64, ComputerRow>,
    last_company_id: i64,
    last_computer_id: i64,
}

impl Tables {
    fn view(&self, id: i64, row: &ComputerRow) -> ComputerView {
        let computer = Computer {
            id,
            name: row.name.clone(),
            introduced: row.introduced.map(Into::into),
            discontinued: row.discontinued.map(Into::into),
            company_id: row.company_id,
        };

        let company_name = row
            .company_id
            .and_then(|company_id| self.companies.get(&company_id).cloned());
        computer.with_company_name(company_name)
    }

    fn matching(&self, filter: &ComputerFilter) -> Vec<ComputerView> {
        self.computers
            .iter()
            .map(|(id, row)| self.view(*id, row))
            .filter(|view| {
                filter.matches(&view.name)
                    || view
                        .company_name
                        .as_deref()
                        .is_some_and(|company| filter.matches(company))
            })
            .collect()
    }

    fn check_constraints(&self, row: &ComputerRow) -> Option<ComputerConstraints> {
        if row.name.trim().is_empty() {
            return Some(ComputerConstraints::NameNotBlank);
        }

        match (row.introduced, row.discontinued) {
            (None, Some(_)) => return Some(ComputerConstraints::DiscontinuedRequiresIntroduced),
            (Some(introduced), Some(discontinued)) if introduced > discontinued => {
                return Some(ComputerConstraints::DiscontinuedAfterIntroduced);
            }
            _ => {}
        }

        row.company_id
            .filter(|company_id| !self.companies.contains_key(company_id))
            .map(|_| ComputerConstraints::CompanyExists)
    }
}

/// Orders present values before absent ones, like PostgreSQL does ascending.
fn nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// Case-insensitive text order, close to the database collation.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn compare_views(sort_by: ComputerSortBy, a: &ComputerView, b: &ComputerView) -> Ordering {
    let primary = match sort_by.field {
        ComputerSortField::Name => Ordering::Equal,
        ComputerSortField::Introduced => nulls_last(a.introduced(), b.introduced(), |a, b| a.cmp(&b)),
        ComputerSortField::Discontinued => {
            nulls_last(a.discontinued(), b.discontinued(), |a, b| a.cmp(&b))
        }
        ComputerSortField::Company => {
            nulls_last(a.company_name.as_deref(), b.company_name.as_deref(), collate)
        }
    };

    let ordering = primary.then_with(|| collate(&a.name, &b.name));
    let ordering = match sort_by.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    };

    ordering.then_with(|| a.id.cmp(&b.id))
}

fn page_of<T>(items: Vec<T>, pagination: OffsetPagination) -> Vec<T> {
    let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(pagination.limit).unwrap_or(0);
    items.into_iter().skip(offset).take(limit).collect()
}

/// Store keeping computers and companies in process memory.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a company and returns it.
    pub async fn insert_company(&self, name: impl Into<String>) -> Company {
        let mut tables = self.tables.write().await;
        tables.last_company_id += 1;
        let id = tables.last_company_id;
        let name = name.into();
        tables.companies.insert(id, name.clone());
        Company::new(id, name)
    }

    /// Makes every following operation fail with a store error, or not.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    fn ensure_available(&self, operation: &'static str) -> Result<()> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(Error::store(operation, "store unavailable"));
        }

        Ok(())
    }

    fn constraint_error(operation: &'static str, constraint: ComputerConstraints) -> Error {
        Error::store(operation, format!("violates constraint {constraint}"))
            .with_constraint(Some(ConstraintViolation::Computer(constraint)))
    }
}

fn row_of(computer: &ComputerDraft) -> ComputerRow {
    ComputerRow {
        name: computer.name.clone(),
        introduced: computer.introduced,
        discontinued: computer.discontinued,
        company_id: computer.company_id,
    }
}

#[async_trait::async_trait]
impl ComputerStore for MemoryStore {
    async fn count(&self, filter: &ComputerFilter) -> Result<i64> {
        self.ensure_available("count_computers")?;
        let tables = self.tables.read().await;
        Ok(tables.matching(filter).len() as i64)
    }

    async fn fetch_page(
        &self,
        filter: &ComputerFilter,
        sort_by: ComputerSortBy,
        pagination: OffsetPagination,
    ) -> Result<Vec<ComputerView>> {
        self.ensure_available("fetch_computer_page")?;
        let tables = self.tables.read().await;
        let mut views = tables.matching(filter);
        views.sort_by(|a, b| compare_views(sort_by, a, b));
        Ok(page_of(views, pagination))
    }

    async fn insert(&self, computer: &ComputerDraft) -> Result<i64> {
        const OPERATION: &str = "insert_computer";
        self.ensure_available(OPERATION)?;

        let mut tables = self.tables.write().await;
        let row = row_of(computer);
        if let Some(constraint) = tables.check_constraints(&row) {
            return Err(Self::constraint_error(OPERATION, constraint));
        }

        tables.last_computer_id += 1;
        let id = tables.last_computer_id;
        tables.computers.insert(id, row);
        Ok(id)
    }

    async fn update(&self, id: i64, computer: &ComputerDraft) -> Result<bool> {
        const OPERATION: &str = "update_computer";
        self.ensure_available(OPERATION)?;

        let mut tables = self.tables.write().await;
        if !tables.computers.contains_key(&id) {
            return Ok(false);
        }

        let row = row_of(computer);
        if let Some(constraint) = tables.check_constraints(&row) {
            return Err(Self::constraint_error(OPERATION, constraint));
        }

        tables.computers.insert(id, row);
        Ok(true)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        self.ensure_available("delete_computer")?;
        let mut tables = self.tables.write().await;
        Ok(tables.computers.remove(&id).is_some())
    }

    async fn delete_by_ids(&self, ids: &[i64]) -> Result<usize> {
        self.ensure_available("delete_computers")?;
        let mut tables = self.tables.write().await;
        Ok(ids
            .iter()
            .filter(|id| tables.computers.remove(id).is_some())
            .count())
    }

    async fn delete_by_company_id(&self, company_id: i64) -> Result<usize> {
        self.ensure_available("delete_company_computers")?;
        let mut tables = self.tables.write().await;
        let before = tables.computers.len();
        tables
            .computers
            .retain(|_, row| row.company_id != Some(company_id));
        Ok(before - tables.computers.len())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ComputerView>> {
        self.ensure_available("get_computer")?;
        let tables = self.tables.read().await;
        Ok(tables.computers.get(&id).map(|row| tables.view(id, row)))
    }
}

#[async_trait::async_trait]
impl CompanyStore for MemoryStore {
    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        self.ensure_available("company_exists")?;
        let tables = self.tables.read().await;
        Ok(tables.companies.contains_key(&id))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Company>> {
        self.ensure_available("get_company")?;
        let tables = self.tables.read().await;
        Ok(tables
            .companies
            .get(&id)
            .map(|name| Company::new(id, name.clone())))
    }

    async fn count(&self) -> Result<i64> {
        self.ensure_available("count_companies")?;
        let tables = self.tables.read().await;
        Ok(tables.companies.len() as i64)
    }

    async fn fetch_page(&self, pagination: OffsetPagination) -> Result<Vec<Company>> {
        self.ensure_available("fetch_company_page")?;
        let tables = self.tables.read().await;
        let mut companies: Vec<Company> = tables
            .companies
            .iter()
            .map(|(id, name)| Company::new(*id, name.clone()))
            .collect();
        companies.sort_by(|a, b| collate(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(page_of(companies, pagination))
    }

    async fn delete_with_computers(&self, id: i64) -> Result<bool> {
        self.ensure_available("delete_company")?;
        let mut tables = self.tables.write().await;
        if tables.companies.remove(&id).is_none() {
            return Ok(false);
        }

        tables.computers.retain(|_, row| row.company_id != Some(id));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i16, month: i8, day: i8) -> Option<civil::Date> {
        Some(civil::date(year, month, day))
    }

    async fn seeded() -> (MemoryStore, Company) {
        let store = MemoryStore::new();
        let apple = store.insert_company("Apple Inc.").await;
        store.insert_company("IBM").await;

        let computers = [
            ComputerDraft::new("MacBook Pro")
                .with_introduced(date(2006, 1, 10))
                .with_company_id(Some(apple.id)),
            ComputerDraft::new("Apple II")
                .with_introduced(date(1977, 4, 1))
                .with_discontinued(date(1993, 10, 1))
                .with_company_id(Some(apple.id)),
            ComputerDraft::new("Homebrew"),
        ];
        for computer in &computers {
            ComputerStore::insert(&store, computer).await.unwrap();
        }

        (store, apple)
    }

    #[tokio::test]
    async fn search_matches_company_names_and_keeps_orphans() {
        let (store, _) = seeded().await;

        let by_company = ComputerFilter::new("APPLE INC");
        assert_eq!(ComputerStore::count(&store, &by_company).await.unwrap(), 2);

        let all = ComputerFilter::default();
        let page = ComputerStore::fetch_page(
            &store,
            &all,
            ComputerSortBy::default(),
            OffsetPagination::new(10, 0),
        )
        .await
        .unwrap();
        let orphan = page.iter().find(|view| view.name == "Homebrew").unwrap();
        assert_eq!(orphan.company_name, None);
    }

    #[tokio::test]
    async fn null_dates_sort_last_ascending_and_first_descending() {
        let (store, _) = seeded().await;
        let filter = ComputerFilter::default();
        let pagination = OffsetPagination::new(10, 0);

        let asc = ComputerStore::fetch_page(
            &store,
            &filter,
            ComputerSortBy::asc(ComputerSortField::Introduced),
            pagination,
        )
        .await
        .unwrap();
        let names: Vec<_> = asc.iter().map(|view| view.name.as_str()).collect();
        assert_eq!(names, ["Apple II", "MacBook Pro", "Homebrew"]);

        let desc = ComputerStore::fetch_page(
            &store,
            &filter,
            ComputerSortBy::desc(ComputerSortField::Introduced),
            pagination,
        )
        .await
        .unwrap();
        let names: Vec<_> = desc.iter().map(|view| view.name.as_str()).collect();
        assert_eq!(names, ["Homebrew", "MacBook Pro", "Apple II"]);
    }

    #[tokio::test]
    async fn names_sort_without_regard_to_case() {
        let store = MemoryStore::new();
        let acorn = store.insert_company("acorn").await;
        store.insert_company("IBM").await;
        store.insert_company("Commodore").await;

        for name in ["BBC Micro", "apple IIe", "Amiga"] {
            let draft = ComputerDraft::new(name).with_company_id(Some(acorn.id));
            ComputerStore::insert(&store, &draft).await.unwrap();
        }

        let page = ComputerStore::fetch_page(
            &store,
            &ComputerFilter::default(),
            ComputerSortBy::default(),
            OffsetPagination::new(10, 0),
        )
        .await
        .unwrap();
        let names: Vec<_> = page.iter().map(|view| view.name.as_str()).collect();
        assert_eq!(names, ["Amiga", "apple IIe", "BBC Micro"]);

        let companies = CompanyStore::fetch_page(&store, OffsetPagination::new(10, 0))
            .await
            .unwrap();
        let names: Vec<_> = companies.iter().map(|company| company.name.as_str()).collect();
        assert_eq!(names, ["acorn", "Commodore", "IBM"]);
    }

    #[tokio::test]
    async fn unknown_company_violates_the_foreign_key() {
        let store = MemoryStore::new();
        let error = ComputerStore::insert(&store, &ComputerDraft::new("Ghost").with_company_id(Some(42)))
            .await
            .unwrap_err();

        assert_eq!(
            error.constraint(),
            Some(ConstraintViolation::Computer(ComputerConstraints::CompanyExists))
        );
    }

    #[tokio::test]
    async fn deleting_a_company_cascades() {
        let (store, apple) = seeded().await;

        assert!(store.delete_with_computers(apple.id).await.unwrap());
        assert!(!store.delete_with_computers(apple.id).await.unwrap());
        assert_eq!(
            ComputerStore::count(&store, &ComputerFilter::default()).await.unwrap(),
            1
        );
    }
}
