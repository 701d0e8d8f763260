//! Sorting options for database queries.

mod computers;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use self::computers::{ComputerSortBy, ComputerSortField};

/// Sort order direction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SortOrder {
    /// Ascending order (A-Z, oldest first, smallest first).
    #[default]
    Asc,
    /// Descending order (Z-A, newest first, largest first).
    Desc,
}

impl SortOrder {
    /// Resolves untrusted input, falling back to [`SortOrder::Asc`] when the
    /// input is absent or unrecognized.
    pub fn resolve(input: Option<&str>) -> Self {
        input
            .and_then(|input| input.trim().parse().ok())
            .unwrap_or_default()
    }
}

/// Generic sort specification with field and order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SortBy<F> {
    /// The field to sort by.
    pub field: F,
    /// The sort order direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl<F: Default> Default for SortBy<F> {
    fn default() -> Self {
        Self {
            field: F::default(),
            order: SortOrder::default(),
        }
    }
}

impl<F> SortBy<F> {
    /// Creates a new sort specification with the given field and order.
    #[inline]
    pub fn new(field: F, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Creates a new sort specification with ascending order.
    #[inline]
    pub fn asc(field: F) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Creates a new sort specification with descending order.
    #[inline]
    pub fn desc(field: F) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Returns whether the sort order is ascending.
    #[inline]
    pub fn is_asc(&self) -> bool {
        matches!(self.order, SortOrder::Asc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_resolves_case_insensitively() {
        assert_eq!(SortOrder::resolve(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::resolve(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::resolve(Some(" Asc ")), SortOrder::Asc);
    }

    #[test]
    fn order_falls_back_to_ascending() {
        assert_eq!(SortOrder::resolve(None), SortOrder::Asc);
        assert_eq!(SortOrder::resolve(Some("")), SortOrder::Asc);
        assert_eq!(SortOrder::resolve(Some("sideways")), SortOrder::Asc);
    }
}
