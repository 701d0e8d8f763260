//! Company model for PostgreSQL database operations.

use diesel::prelude::*;

use crate::schema::companies;

/// A company that introduces computers.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Company {
    /// Unique company identifier.
    pub id: i64,
    /// Display name of the company.
    pub name: String,
}

/// Data structure for creating a new company.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCompany {
    /// Display name of the company.
    pub name: String,
}

impl Company {
    /// Creates a company from its parts.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl NewCompany {
    /// Creates an insertable company with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
