//! Candidate computer records.

use jiff::civil;
use serde::{Deserialize, Serialize};

/// A computer as submitted by a caller, before it is validated and stored.
///
/// A draft without an id describes a computer to create; a draft with an id
/// fully replaces the stored computer with that id.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputerDraft {
    /// Identity of the stored computer, absent until it is persisted.
    pub id: Option<i64>,
    /// Display name of the computer.
    pub name: String,
    /// Date the computer was introduced.
    pub introduced: Option<civil::Date>,
    /// Date the computer was discontinued.
    pub discontinued: Option<civil::Date>,
    /// Company that introduced the computer.
    pub company_id: Option<i64>,
}

impl ComputerDraft {
    /// Creates a draft for a new computer with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the identity of the computer to replace.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the introduction date.
    pub fn with_introduced(mut self, introduced: Option<civil::Date>) -> Self {
        self.introduced = introduced;
        self
    }

    /// Sets the discontinuation date.
    pub fn with_discontinued(mut self, discontinued: Option<civil::Date>) -> Self {
        self.discontinued = discontinued;
        self
    }

    /// Sets the company that introduced the computer.
    pub fn with_company_id(mut self, company_id: Option<i64>) -> Self {
        self.company_id = company_id;
        self
    }
}
