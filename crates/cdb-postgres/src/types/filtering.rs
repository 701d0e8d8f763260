//! Filtering options for computer listings.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Free-text filter for computer listings.
///
/// A computer matches when its name, or the name of its company, contains
/// the search term ignoring case.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct ComputerFilter {
    /// Search term, already trimmed. Never empty when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
}

impl ComputerFilter {
    /// Creates a filter from an untrusted search term.
    ///
    /// Surrounding whitespace is dropped; a blank term matches everything.
    pub fn new(search: impl AsRef<str>) -> Self {
        let search = search.as_ref().trim();
        Self {
            search: (!search.is_empty()).then(|| search.to_owned()),
        }
    }

    /// Creates a filter from an optional search term.
    pub fn from_search(search: Option<&str>) -> Self {
        search.map(Self::new).unwrap_or_default()
    }

    /// Returns whether any filter is active.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
    }

    /// Returns the trimmed search term.
    #[inline]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the `LIKE` pattern matching the search term anywhere in a value.
    ///
    /// `%`, `_` and `\` in the term are escaped so they match literally.
    pub fn like_pattern(&self) -> Option<String> {
        let term = self.search.as_deref()?;
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }

    /// Returns whether `value` contains the search term, ignoring case.
    ///
    /// Mirrors the `ILIKE` predicate for stores that filter in memory.
    pub fn matches(&self, value: &str) -> bool {
        match self.search.as_deref() {
            Some(term) => value.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        }
    }
}
