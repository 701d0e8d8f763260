//! Computer request types.

use cdb_postgres::types::ComputerSortBy;
use jiff::civil::Date;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Pagination;
use crate::service::{ComputerDraft, ListingConfig, ListingRequest, Result};

/// Query parameters for listing computers.
///
/// Unknown `sort` and `order` values fall back to sorting by name,
/// ascending.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListComputers {
    /// Case-insensitive search on computer and company names.
    pub search: Option<String>,
    /// Column to sort by: `name`, `introduced`, `discontinued` or `company`.
    pub sort: Option<String>,
    /// Sort direction: `asc` or `desc`.
    pub order: Option<String>,
    /// Zero-based page number.
    pub page: Option<i64>,
    /// Number of items per page.
    pub page_size: Option<i64>,
}

impl ListComputers {
    /// Converts the query into a listing request.
    pub fn into_listing_request(self, config: &ListingConfig) -> Result<ListingRequest> {
        let pagination = Pagination {
            page: self.page,
            page_size: self.page_size,
        };
        let page = pagination.into_page_request(config)?;
        let sort_by = ComputerSortBy::resolve(self.sort.as_deref(), self.order.as_deref());

        Ok(ListingRequest::new(page.page, page.page_size)
            .with_search(self.search.unwrap_or_default())
            .with_sort_by(sort_by))
    }
}

/// Request payload describing a computer.
///
/// Used both to create a computer, where the id must be absent, and to
/// replace one, where the path id wins over the body. Business rules are
/// checked by the catalog so that every broken rule is reported at once.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComputerRequest {
    /// Must be absent when creating a computer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name of the computer.
    #[serde(default)]
    pub name: String,
    /// Introduction date, formatted `YYYY-MM-DD`.
    pub introduced: Option<Date>,
    /// Discontinuation date, formatted `YYYY-MM-DD`.
    pub discontinued: Option<Date>,
    /// ID of the company that introduced the computer.
    pub company_id: Option<i64>,
}

impl ComputerRequest {
    /// Converts this request into a draft for the catalog.
    pub fn into_draft(self) -> ComputerDraft {
        ComputerDraft {
            id: self.id,
            name: self.name,
            introduced: self.introduced,
            discontinued: self.discontinued,
            company_id: self.company_id,
        }
    }
}

/// Request payload for deleting several computers at once.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeleteComputers {
    /// IDs of the computers to delete; unknown ids are ignored.
    #[validate(length(min = 1, max = 1000))]
    pub ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use cdb_postgres::types::{ComputerSortField, SortOrder};

    use super::*;

    #[test]
    fn unknown_sort_values_fall_back_to_name_ascending() {
        let query = ListComputers {
            sort: Some("price".into()),
            order: Some("sideways".into()),
            ..Default::default()
        };

        let request = query.into_listing_request(&ListingConfig::default()).unwrap();
        assert_eq!(request.sort_by.field, ComputerSortField::Name);
        assert_eq!(request.sort_by.order, SortOrder::Asc);
    }

    #[test]
    fn company_name_resolves_to_the_company_column() {
        let query = ListComputers {
            sort: Some("COMPANY_NAME".into()),
            order: Some("DESC".into()),
            search: Some("  apple ".into()),
            ..Default::default()
        };

        let request = query.into_listing_request(&ListingConfig::default()).unwrap();
        assert_eq!(request.sort_by.field, ComputerSortField::Company);
        assert_eq!(request.sort_by.order, SortOrder::Desc);
        assert_eq!(request.filter.search_term(), Some("apple"));
    }

    #[test]
    fn dates_use_iso_format() {
        let request: ComputerRequest = serde_json::from_str(
            r#"{"name":"Apple II","introduced":"1977-04-01","companyId":1}"#,
        )
        .unwrap();

        let draft = request.into_draft();
        assert_eq!(draft.introduced, Some(jiff::civil::date(1977, 4, 1)));
        assert_eq!(draft.discontinued, None);
        assert_eq!(draft.company_id, Some(1));
    }
}
