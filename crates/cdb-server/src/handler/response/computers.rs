//! Computer response types.

use cdb_postgres::model::ComputerView;
use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Page;

/// Computer response, joined with the name of its company.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Computer {
    /// ID of the computer.
    pub id: i64,
    /// Display name of the computer.
    pub name: String,
    /// Date the computer was introduced.
    pub introduced: Option<Date>,
    /// Date the computer was discontinued.
    pub discontinued: Option<Date>,
    /// ID of the company that introduced the computer.
    pub company_id: Option<i64>,
    /// Name of the company that introduced the computer.
    pub company_name: Option<String>,
}

impl Computer {
    /// Creates a new instance of [`Computer`] from a joined row.
    pub fn from_model(view: ComputerView) -> Self {
        Self {
            id: view.id,
            introduced: view.introduced(),
            discontinued: view.discontinued(),
            name: view.name,
            company_id: view.company_id,
            company_name: view.company_name,
        }
    }
}

/// Response for listing computers.
pub type ComputersPage = Page<Computer>;

/// Identity of a created computer.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComputerCreated {
    /// ID assigned to the computer.
    pub id: i64,
}
