//! Path parameter types for HTTP handlers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Path parameters for computer operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputerPathParams {
    /// Unique identifier of the computer.
    pub computer_id: i64,
}

/// Path parameters for company operations.
#[must_use]
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPathParams {
    /// Unique identifier of the company.
    pub company_id: i64,
}
