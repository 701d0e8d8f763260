//! Field-keyed validation of computer drafts.
//!
//! Every rule is a plain function returning its own [`ValidationResult`];
//! [`ComputerValidator`] runs all of them and merges the results in order, so
//! a later rule overwrites the message of an earlier one on the same field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use cdb_postgres::types::{ComputerConstraints, ConstraintViolation};
use jiff::civil;
use serde::Serialize;

use super::ComputerDraft;
use super::store::CompanyStore;
use crate::{Result, TRACING_TARGET_CATALOG};

/// Earliest date accepted for introduction and discontinuation.
pub const EARLIEST_DATE: civil::Date = civil::date(1970, 1, 1);

/// Names of the validated fields.
pub mod fields {
    pub const NAME: &str = "name";
    pub const INTRODUCED: &str = "introduced";
    pub const DISCONTINUED: &str = "discontinued";
    pub const COMPANY: &str = "company";
}

/// Messages reported for each broken rule.
pub mod messages {
    pub const NAME_REQUIRED: &str = "Name should be filled!";
    pub const INTRODUCED_INVALID: &str = "Introduction date must be empty or a valid date!";
    pub const DISCONTINUED_INVALID: &str = "Discontinuation date must be empty or a valid date!";
    pub const DISCONTINUED_WITHOUT_INTRODUCED: &str =
        "Discontinuation date requires an introduction date!";
    pub const DISCONTINUED_BEFORE_INTRODUCED: &str =
        "Discontinuation date must be superior to the introduction date!";
    pub const COMPANY_UNKNOWN: &str = "Company which introduced the computer does not exist";
}

/// Field-keyed validation errors, one message per field.
///
/// An empty result means the draft is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult(BTreeMap<&'static str, &'static str>);

impl ValidationResult {
    /// Creates an empty result.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether no rule was broken.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// Records an error on a field, replacing any previous one.
    pub fn with(mut self, field: &'static str, message: &'static str) -> Self {
        self.0.insert(field, message);
        self
    }

    /// Merges another result into this one; its messages win.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Returns the message recorded for a field.
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    /// Returns the number of invalid fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no field is invalid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    /// Translates a constraint the store rejected into the field error the
    /// validator would have reported.
    ///
    /// Returns `None` for constraints with no field counterpart.
    pub fn from_constraint(constraint: ConstraintViolation) -> Option<Self> {
        let ConstraintViolation::Computer(constraint) = constraint else {
            return None;
        };

        let result = Self::new();
        let result = match constraint {
            ComputerConstraints::NameNotBlank => result.with(fields::NAME, messages::NAME_REQUIRED),
            ComputerConstraints::DiscontinuedRequiresIntroduced => result.with(
                fields::DISCONTINUED,
                messages::DISCONTINUED_WITHOUT_INTRODUCED,
            ),
            ComputerConstraints::DiscontinuedAfterIntroduced => result.with(
                fields::DISCONTINUED,
                messages::DISCONTINUED_BEFORE_INTRODUCED,
            ),
            ComputerConstraints::CompanyExists => {
                result.with(fields::COMPANY, messages::COMPANY_UNKNOWN)
            }
        };

        Some(result)
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Source of the current civil date.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Returns today's date.
    fn today(&self) -> civil::Date;
}

/// Clock reading the system time in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> civil::Date {
        jiff::Zoned::now().date()
    }
}

/// Clock frozen on a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub civil::Date);

impl Clock for FixedClock {
    fn today(&self) -> civil::Date {
        self.0
    }
}

/// Requires a name with at least one non-whitespace character.
pub fn check_name(name: &str) -> ValidationResult {
    let result = ValidationResult::new();
    if name.trim().is_empty() {
        return result.with(fields::NAME, messages::NAME_REQUIRED);
    }
    result
}

/// Requires an optional date to fall between [`EARLIEST_DATE`] and `today`.
pub fn check_date(
    field: &'static str,
    message: &'static str,
    date: Option<civil::Date>,
    today: civil::Date,
) -> ValidationResult {
    let result = ValidationResult::new();
    match date {
        Some(date) if date < EARLIEST_DATE || date > today => result.with(field, message),
        _ => result,
    }
}

/// Requires a discontinuation date to follow an introduction date.
pub fn check_chronology(
    introduced: Option<civil::Date>,
    discontinued: Option<civil::Date>,
) -> ValidationResult {
    let result = ValidationResult::new();
    match (introduced, discontinued) {
        (None, Some(_)) => result.with(
            fields::DISCONTINUED,
            messages::DISCONTINUED_WITHOUT_INTRODUCED,
        ),
        (Some(introduced), Some(discontinued)) if introduced > discontinued => result.with(
            fields::DISCONTINUED,
            messages::DISCONTINUED_BEFORE_INTRODUCED,
        ),
        _ => result,
    }
}

/// Validates computer drafts against the catalog rules.
#[derive(Clone)]
pub struct ComputerValidator {
    companies: Arc<dyn CompanyStore>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for ComputerValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputerValidator")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl ComputerValidator {
    /// Creates a validator checking companies against the given store.
    pub fn new(companies: Arc<dyn CompanyStore>, clock: Arc<dyn Clock>) -> Self {
        Self { companies, clock }
    }

    /// Runs every rule against the draft.
    ///
    /// Broken rules are returned as data. Only a failing company lookup
    /// produces an error.
    pub async fn validate(&self, computer: &ComputerDraft) -> Result<ValidationResult> {
        let today = self.clock.today();

        let result = check_name(&computer.name)
            .merge(check_date(
                fields::INTRODUCED,
                messages::INTRODUCED_INVALID,
                computer.introduced,
                today,
            ))
            .merge(check_date(
                fields::DISCONTINUED,
                messages::DISCONTINUED_INVALID,
                computer.discontinued,
                today,
            ))
            .merge(self.check_company(computer.company_id).await?)
            .merge(check_chronology(computer.introduced, computer.discontinued));

        if !result.is_valid() {
            tracing::debug!(
                target: TRACING_TARGET_CATALOG,
                invalid_fields = result.len(),
                "computer draft rejected"
            );
        }

        Ok(result)
    }

    async fn check_company(&self, company_id: Option<i64>) -> Result<ValidationResult> {
        let result = ValidationResult::new();
        let Some(company_id) = company_id else {
            return Ok(result);
        };

        if self.companies.exists_by_id(company_id).await? {
            Ok(result)
        } else {
            Ok(result.with(fields::COMPANY, messages::COMPANY_UNKNOWN))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryStore;

    fn today() -> civil::Date {
        civil::date(2024, 6, 15)
    }

    async fn validator() -> (ComputerValidator, i64) {
        let store = MemoryStore::new();
        let company = store.insert_company("Apple Inc.").await;
        let validator = ComputerValidator::new(Arc::new(store), Arc::new(FixedClock(today())));
        (validator, company.id)
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(check_name("   ").get(fields::NAME), Some(messages::NAME_REQUIRED));
        assert!(check_name("Apple II").is_valid());
    }

    #[test]
    fn dates_are_bounded_by_the_epoch_and_today() {
        let check = |date| check_date(fields::INTRODUCED, messages::INTRODUCED_INVALID, date, today());

        assert!(check(None).is_valid());
        assert!(check(Some(EARLIEST_DATE)).is_valid());
        assert!(check(Some(today())).is_valid());
        assert!(!check(Some(civil::date(1969, 12, 31))).is_valid());
        assert!(!check(Some(civil::date(2024, 6, 16))).is_valid());
    }

    #[test]
    fn chronology_requires_ordered_dates() {
        let early = Some(civil::date(2020, 1, 1));
        let late = Some(civil::date(2020, 6, 1));

        assert!(check_chronology(early, late).is_valid());
        assert!(check_chronology(early, early).is_valid());
        assert!(check_chronology(early, None).is_valid());
        assert_eq!(
            check_chronology(None, late).get(fields::DISCONTINUED),
            Some(messages::DISCONTINUED_WITHOUT_INTRODUCED)
        );
        assert_eq!(
            check_chronology(late, early).get(fields::DISCONTINUED),
            Some(messages::DISCONTINUED_BEFORE_INTRODUCED)
        );
    }

    #[test]
    fn merge_keeps_the_last_message_per_field() {
        let first = ValidationResult::new().with(fields::DISCONTINUED, messages::DISCONTINUED_INVALID);
        let second = ValidationResult::new()
            .with(fields::DISCONTINUED, messages::DISCONTINUED_WITHOUT_INTRODUCED);

        let merged = first.merge(second);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged.get(fields::DISCONTINUED),
            Some(messages::DISCONTINUED_WITHOUT_INTRODUCED)
        );
    }

    #[tokio::test]
    async fn empty_name_is_the_only_error() {
        let (validator, _) = validator().await;
        let result = validator.validate(&ComputerDraft::new("")).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(fields::NAME), Some(messages::NAME_REQUIRED));
    }

    #[tokio::test]
    async fn reversed_dates_report_discontinued_only() {
        let (validator, _) = validator().await;
        let draft = ComputerDraft::new("ok")
            .with_introduced(Some(civil::date(2020, 6, 1)))
            .with_discontinued(Some(civil::date(2020, 1, 1)));

        let result = validator.validate(&draft).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get(fields::DISCONTINUED),
            Some(messages::DISCONTINUED_BEFORE_INTRODUCED)
        );
    }

    #[tokio::test]
    async fn chronology_overrides_the_date_bound_on_discontinued() {
        let (validator, _) = validator().await;
        let draft = ComputerDraft::new("ok").with_discontinued(Some(civil::date(2030, 1, 1)));

        let result = validator.validate(&draft).await.unwrap();
        assert_eq!(
            result.get(fields::DISCONTINUED),
            Some(messages::DISCONTINUED_WITHOUT_INTRODUCED)
        );
    }

    #[tokio::test]
    async fn unknown_companies_are_rejected() {
        let (validator, company_id) = validator().await;

        let known = ComputerDraft::new("ok").with_company_id(Some(company_id));
        assert!(validator.validate(&known).await.unwrap().is_valid());

        let unknown = ComputerDraft::new("ok").with_company_id(Some(company_id + 100));
        let result = validator.validate(&unknown).await.unwrap();
        assert_eq!(result.get(fields::COMPANY), Some(messages::COMPANY_UNKNOWN));
    }

    #[tokio::test]
    async fn validation_is_repeatable() {
        let (validator, _) = validator().await;
        let draft = ComputerDraft::new(" ")
            .with_introduced(Some(civil::date(1960, 1, 1)))
            .with_company_id(Some(999));

        let first = validator.validate(&draft).await.unwrap();
        let second = validator.validate(&draft).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn foreign_key_violations_map_to_the_company_field() {
        let violation = ConstraintViolation::Computer(ComputerConstraints::CompanyExists);
        let result = ValidationResult::from_constraint(violation).unwrap();
        assert_eq!(result.get(fields::COMPANY), Some(messages::COMPANY_UNKNOWN));
    }
}
