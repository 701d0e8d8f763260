//! Database constraint violations organized by table.

mod companies;
mod computers;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::companies::CompanyConstraints;
pub use self::computers::ComputerConstraints;

/// Any known constraint of the catalog schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Company(CompanyConstraints),
    Computer(ComputerConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (date relationships).
    Chronological,
    /// Referential integrity constraints (foreign keys).
    Referential,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is not recognized.
    ///
    /// ```
    /// use cdb_postgres::types::{ComputerConstraints, ConstraintViolation};
    ///
    /// let violation = ConstraintViolation::new("computers_company_id_fkey");
    /// assert_eq!(
    ///     violation,
    ///     Some(ConstraintViolation::Computer(ComputerConstraints::CompanyExists))
    /// );
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;
        match prefix {
            "companies" => CompanyConstraints::new(constraint).map(Self::Company),
            "computers" => ComputerConstraints::new(constraint).map(Self::Computer),
            _ => None,
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Company(_) => "companies",
            ConstraintViolation::Computer(_) => "computers",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Company(c) => c.categorize(),
            ConstraintViolation::Computer(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Company(c) => write!(f, "{}", c),
            ConstraintViolation::Computer(c) => write!(f, "{}", c),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("Unknown constraint: {}", value))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_constraint_name_parses_back() {
        for constraint in ComputerConstraints::iter() {
            let violation = ConstraintViolation::new(&constraint.to_string());
            assert_eq!(violation, Some(ConstraintViolation::Computer(constraint)));
        }

        for constraint in CompanyConstraints::iter() {
            let violation = ConstraintViolation::new(&constraint.to_string());
            assert_eq!(violation, Some(ConstraintViolation::Company(constraint)));
        }
    }

    #[test]
    fn unknown_constraints_are_rejected() {
        assert_eq!(ConstraintViolation::new("computers_price_positive"), None);
        assert_eq!(ConstraintViolation::new("accounts_email_unique"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn violations_know_their_table_and_category() {
        let violation = ConstraintViolation::Computer(ComputerConstraints::CompanyExists);
        assert_eq!(violation.table_name(), "computers");
        assert_eq!(
            violation.constraint_category(),
            ConstraintCategory::Referential
        );

        let violation = ConstraintViolation::Company(CompanyConstraints::NameNotBlank);
        assert_eq!(violation.table_name(), "companies");
        assert_eq!(
            violation.constraint_category(),
            ConstraintCategory::Validation
        );
    }
}
