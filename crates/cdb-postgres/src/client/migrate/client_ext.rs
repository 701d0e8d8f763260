//! Migrations as a method on [`PgClient`].

use super::{MigrationResult, run_pending_migrations};
use crate::{PgClient, PgResult};

/// Adds [`run_pending_migrations`](PgClientMigrationExt::run_pending_migrations) to [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every embedded migration the database has not seen yet.
    ///
    /// A database that is already current is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when a migration fails or no connection is available.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>>;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }
}
