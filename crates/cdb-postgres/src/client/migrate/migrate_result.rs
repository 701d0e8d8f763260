//! Status and result types for migration operations.

use std::time::Duration;

/// Applied and pending migration versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MigrationStatus {
    /// Applied migration versions in chronological order.
    pub applied_versions: Vec<String>,
    /// Embedded migration versions not yet applied.
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    /// Creates a new migration status.
    pub fn new(
        applied_versions: impl Into<Vec<String>>,
        pending_versions: impl Into<Vec<String>>,
    ) -> Self {
        Self {
            applied_versions: applied_versions.into(),
            pending_versions: pending_versions.into(),
        }
    }

    /// Returns the number of applied migrations.
    #[inline]
    pub fn applied_migrations(&self) -> usize {
        self.applied_versions.len()
    }

    /// Returns the number of pending migrations.
    #[inline]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    /// Returns true if all migrations have been applied.
    #[inline]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Total duration of the migration operation
    pub duration: Duration,
    /// Migration versions that were applied during this run
    pub processed_versions: Vec<String>,
}

impl MigrationResult {
    /// Creates a successful migration result.
    pub fn success(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
        }
    }

    /// Returns the number of migrations applied during this run.
    #[inline]
    pub fn applied_count(&self) -> usize {
        self.processed_versions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reports_pending_versions() {
        let status = MigrationStatus::new(vec!["20250101000000".to_owned()], Vec::new());
        assert!(status.is_up_to_date());
        assert_eq!(status.applied_migrations(), 1);

        let status = MigrationStatus::new(Vec::new(), vec!["20250101000000".to_owned()]);
        assert!(!status.is_up_to_date());
        assert_eq!(status.pending_migrations(), 1);
        assert_eq!(status.applied_migrations(), 0);
    }
}
