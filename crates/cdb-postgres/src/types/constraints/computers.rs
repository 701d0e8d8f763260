//! Computers table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Computers table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ComputerConstraints {
    #[strum(serialize = "computers_name_not_blank")]
    NameNotBlank,

    #[strum(serialize = "computers_discontinued_requires_introduced")]
    DiscontinuedRequiresIntroduced,
    #[strum(serialize = "computers_discontinued_after_introduced")]
    DiscontinuedAfterIntroduced,

    #[strum(serialize = "computers_company_id_fkey")]
    CompanyExists,
}

impl ComputerConstraints {
    /// Creates a new [`ComputerConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ComputerConstraints::NameNotBlank => ConstraintCategory::Validation,

            ComputerConstraints::DiscontinuedRequiresIntroduced
            | ComputerConstraints::DiscontinuedAfterIntroduced => ConstraintCategory::Chronological,

            ComputerConstraints::CompanyExists => ConstraintCategory::Referential,
        }
    }
}

impl From<ComputerConstraints> for String {
    #[inline]
    fn from(val: ComputerConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ComputerConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
