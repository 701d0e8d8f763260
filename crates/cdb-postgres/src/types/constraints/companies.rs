//! Companies table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Companies table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum CompanyConstraints {
    #[strum(serialize = "companies_name_not_blank")]
    NameNotBlank,
}

impl CompanyConstraints {
    /// Creates a new [`CompanyConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            CompanyConstraints::NameNotBlank => ConstraintCategory::Validation,
        }
    }
}

impl From<CompanyConstraints> for String {
    #[inline]
    fn from(val: CompanyConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for CompanyConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
