//! Company response types.

use cdb_postgres::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Page;

/// Company response.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// ID of the company.
    pub id: i64,
    /// Display name of the company.
    pub name: String,
}

impl Company {
    pub fn from_model(company: model::Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
        }
    }
}

/// Response for listing companies.
pub type CompaniesPage = Page<Company>;
