//! Sorting options for computer listings.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{SortBy, SortOrder};

/// Columns a computer listing can be sorted by.
///
/// Every column breaks ties on the computer name, then on the computer id.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ComputerSortField {
    /// Sort by computer name.
    #[default]
    Name,
    /// Sort by introduction date.
    Introduced,
    /// Sort by discontinuation date.
    Discontinued,
    /// Sort by the name of the company.
    #[serde(alias = "company_name")]
    #[strum(to_string = "company", serialize = "company_name")]
    Company,
}

impl ComputerSortField {
    /// Resolves untrusted input, falling back to [`ComputerSortField::Name`]
    /// when the input is absent or unrecognized.
    pub fn resolve(input: Option<&str>) -> Self {
        input
            .and_then(|input| input.trim().parse().ok())
            .unwrap_or_default()
    }
}

/// Sorting specification for computers.
pub type ComputerSortBy = SortBy<ComputerSortField>;

impl ComputerSortBy {
    /// Resolves an untrusted column and direction pair.
    ///
    /// Each half falls back independently, so `("bogus", "desc")` sorts by
    /// name descending.
    pub fn resolve(field: Option<&str>, order: Option<&str>) -> Self {
        Self::new(ComputerSortField::resolve(field), SortOrder::resolve(order))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn fields_resolve_case_insensitively() {
        assert_eq!(
            ComputerSortField::resolve(Some("INTRODUCED")),
            ComputerSortField::Introduced
        );
        assert_eq!(
            ComputerSortField::resolve(Some("Discontinued")),
            ComputerSortField::Discontinued
        );
        assert_eq!(
            ComputerSortField::resolve(Some("company")),
            ComputerSortField::Company
        );
        assert_eq!(
            ComputerSortField::resolve(Some("COMPANY_NAME")),
            ComputerSortField::Company
        );
    }

    #[test]
    fn unknown_input_sorts_by_name_ascending() {
        let sort_by = ComputerSortBy::resolve(Some("price"), Some("upwards"));
        assert_eq!(sort_by, ComputerSortBy::asc(ComputerSortField::Name));

        let sort_by = ComputerSortBy::resolve(None, None);
        assert_eq!(sort_by, ComputerSortBy::default());
    }

    #[test]
    fn halves_fall_back_independently() {
        let sort_by = ComputerSortBy::resolve(Some("bogus"), Some("DESC"));
        assert_eq!(sort_by, ComputerSortBy::desc(ComputerSortField::Name));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for field in ComputerSortField::iter() {
            assert_eq!(ComputerSortField::resolve(Some(&field.to_string())), field);
        }
    }
}
