//! Computer model for PostgreSQL database operations.
//!
//! Dates are stored as `DATE` columns and exposed as [`jiff::civil::Date`]
//! through accessor methods.

use diesel::prelude::*;
use jiff::civil;
use jiff_diesel::Date;

use crate::schema::computers;

/// A computer row as stored in the `computers` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = computers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Computer {
    /// Unique computer identifier.
    pub id: i64,
    /// Display name of the computer.
    pub name: String,
    /// Date the computer was introduced.
    pub introduced: Option<Date>,
    /// Date the computer was discontinued.
    pub discontinued: Option<Date>,
    /// Company that introduced the computer.
    pub company_id: Option<i64>,
}

/// Data structure for creating a new computer.
#[derive(Debug, Clone, Default, Insertable)]
#[diesel(table_name = computers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewComputer {
    /// Display name of the computer.
    pub name: String,
    /// Date the computer was introduced.
    pub introduced: Option<Date>,
    /// Date the computer was discontinued.
    pub discontinued: Option<Date>,
    /// Company that introduced the computer.
    pub company_id: Option<i64>,
}

/// Full replacement of the mutable columns of a computer.
///
/// `None` fields are written as `NULL`, so an update always leaves the row
/// exactly as described by this changeset.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = computers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UpdateComputer {
    /// Display name of the computer.
    pub name: String,
    /// Date the computer was introduced.
    pub introduced: Option<Date>,
    /// Date the computer was discontinued.
    pub discontinued: Option<Date>,
    /// Company that introduced the computer.
    pub company_id: Option<i64>,
}

/// A computer joined with the name of its company.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputerView {
    /// Unique computer identifier.
    pub id: i64,
    /// Display name of the computer.
    pub name: String,
    /// Date the computer was introduced.
    pub introduced: Option<Date>,
    /// Date the computer was discontinued.
    pub discontinued: Option<Date>,
    /// Company that introduced the computer.
    pub company_id: Option<i64>,
    /// Name of the company, when the computer has one.
    pub company_name: Option<String>,
}

impl Computer {
    /// Returns the introduction date.
    #[inline]
    pub fn introduced(&self) -> Option<civil::Date> {
        self.introduced.map(Into::into)
    }

    /// Returns the discontinuation date.
    #[inline]
    pub fn discontinued(&self) -> Option<civil::Date> {
        self.discontinued.map(Into::into)
    }

    /// Joins this computer with the name of its company.
    pub fn with_company_name(self, company_name: Option<String>) -> ComputerView {
        ComputerView {
            id: self.id,
            name: self.name,
            introduced: self.introduced,
            discontinued: self.discontinued,
            company_id: self.company_id,
            company_name,
        }
    }
}

impl From<(Computer, Option<String>)> for ComputerView {
    #[inline]
    fn from((computer, company_name): (Computer, Option<String>)) -> Self {
        computer.with_company_name(company_name)
    }
}

impl ComputerView {
    /// Returns the introduction date.
    #[inline]
    pub fn introduced(&self) -> Option<civil::Date> {
        self.introduced.map(Into::into)
    }

    /// Returns the discontinuation date.
    #[inline]
    pub fn discontinued(&self) -> Option<civil::Date> {
        self.discontinued.map(Into::into)
    }
}

impl NewComputer {
    /// Creates an insertable computer from plain calendar dates.
    pub fn new(
        name: impl Into<String>,
        introduced: Option<civil::Date>,
        discontinued: Option<civil::Date>,
        company_id: Option<i64>,
    ) -> Self {
        Self {
            name: name.into(),
            introduced: introduced.map(Into::into),
            discontinued: discontinued.map(Into::into),
            company_id,
        }
    }
}

impl UpdateComputer {
    /// Creates a replacement changeset from plain calendar dates.
    pub fn new(
        name: impl Into<String>,
        introduced: Option<civil::Date>,
        discontinued: Option<civil::Date>,
        company_id: Option<i64>,
    ) -> Self {
        Self {
            name: name.into(),
            introduced: introduced.map(Into::into),
            discontinued: discontinued.map(Into::into),
            company_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn dates_round_trip_through_storage_wrappers() {
        let computer = Computer {
            id: 1,
            name: "Apple II".into(),
            introduced: Some(date(1977, 4, 1).into()),
            discontinued: None,
            company_id: Some(1),
        };

        assert_eq!(computer.introduced(), Some(date(1977, 4, 1)));
        assert_eq!(computer.discontinued(), None);

        let view = computer.with_company_name(Some("Apple Inc.".into()));
        assert_eq!(view.company_name.as_deref(), Some("Apple Inc."));
        assert_eq!(view.introduced(), Some(date(1977, 4, 1)));
    }
}
