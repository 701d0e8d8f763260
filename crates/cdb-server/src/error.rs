//! Service layer error types.
//!
//! Validation failures are not errors: they are returned as data through
//! [`Validated`]. An [`Error`] always means the request itself could not be
//! served, either because the caller broke a contract, the target does not
//! exist, or the store failed.
//!
//! [`Validated`]: crate::service::Validated

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use cdb_postgres::types::ConstraintViolation;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing service layer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller broke an operation contract (bad page, missing id, ...).
    Caller,
    /// The targeted computer or company does not exist.
    NotFound,
    /// The store failed to run an operation.
    Store,
    /// Configuration-related errors.
    Config,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Caller => "caller",
            Self::NotFound => "not_found",
            Self::Store => "store",
            Self::Config => "config",
        }
    }

    /// Returns whether errors of this kind are expected outcomes of user input.
    #[must_use]
    pub const fn is_expected(self) -> bool {
        matches!(self, Self::Caller | Self::NotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with structured information.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
    constraint: Option<ConstraintViolation>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            constraint: None,
        }
    }

    /// Attaches a source error to this error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Records the database constraint the failed operation violated.
    #[inline]
    pub fn with_constraint(mut self, constraint: Option<ConstraintViolation>) -> Self {
        self.constraint = constraint;
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the violated constraint, if the store reported one.
    #[must_use]
    #[inline]
    pub fn constraint(&self) -> Option<ConstraintViolation> {
        self.constraint
    }

    /// Creates a new caller error.
    #[inline]
    pub fn caller(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Caller, message)
    }

    /// Creates a new not found error.
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Creates a new store error for the named logical operation.
    #[inline]
    pub fn store(operation: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        let message = message.into();
        Self::new(ErrorKind::Store, format!("{operation}: {message}"))
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }
}

#[cfg(test)]
mod tests {
    use cdb_postgres::types::ComputerConstraints;

    use super::*;

    #[test]
    fn caller_errors_are_expected() {
        let error = Error::caller("page size must be positive");
        assert_eq!(error.kind(), ErrorKind::Caller);
        assert!(error.kind().is_expected());
        assert_eq!(error.message(), "page size must be positive");
    }

    #[test]
    fn store_errors_name_the_operation() {
        let source = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let error = Error::store("count_computers", "connection lost").with_source(source);

        assert_eq!(error.kind(), ErrorKind::Store);
        assert!(!error.kind().is_expected());
        assert!(error.to_string().contains("count_computers"));
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn constraints_are_carried() {
        let constraint = ConstraintViolation::Computer(ComputerConstraints::CompanyExists);
        let error = Error::store("insert_computer", "foreign key").with_constraint(Some(constraint));
        assert_eq!(error.constraint(), Some(constraint));
    }

    #[test]
    fn error_kind_as_str() {
        assert_eq!(ErrorKind::Caller.as_str(), "caller");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
        assert_eq!(ErrorKind::Store.as_str(), "store");
        assert_eq!(ErrorKind::Config.as_str(), "config");
    }
}
