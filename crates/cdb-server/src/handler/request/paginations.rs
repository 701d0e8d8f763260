use cdb_postgres::types::PageRequest;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::service::{ListingConfig, Result};

/// Zero-based page selection shared by the listing endpoints.
///
/// Omitted values fall back to the first page and the configured default
/// page size.
#[must_use]
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Zero-based page number.
    pub page: Option<i64>,
    /// Number of items per page.
    pub page_size: Option<i64>,
}

impl Pagination {
    /// Resolves the requested page against the listing limits.
    pub fn into_page_request(self, config: &ListingConfig) -> Result<PageRequest> {
        let page_size = config.page_size(self.page_size)?;
        Ok(PageRequest::new(self.page.unwrap_or_default(), page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_values_take_defaults() {
        let request = Pagination::default()
            .into_page_request(&ListingConfig::default())
            .unwrap();
        assert_eq!(request, PageRequest::new(0, 10));
    }

    #[test]
    fn oversized_pages_are_rejected() {
        let pagination = Pagination {
            page: Some(0),
            page_size: Some(5000),
        };
        assert!(pagination.into_page_request(&ListingConfig::default()).is_err());
    }
}
