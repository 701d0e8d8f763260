//! Hooks run around [`run_pending_migrations`].
//!
//! [`run_pending_migrations`]: super::run_pending_migrations

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::PoolableConnection;

use crate::{PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Refuses to migrate over a connection that is already broken.
pub async fn pre_migrate(conn: &mut AsyncPgConnection) -> PgResult<()> {
    if conn.is_broken() {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            hook = "pre_migrate",
            "Connection is broken before migrations"
        );
        return Err(PgError::Migration(
            "Connection is broken before migrations".into(),
        ));
    }

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        hook = "pre_migrate",
        "Preparing to run database migrations"
    );

    Ok(())
}

/// Reports the connection state once migrations finished.
pub async fn post_migrate(conn: &mut AsyncPgConnection) -> PgResult<()> {
    let is_broken = conn.is_broken();

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        hook = "post_migrate",
        is_broken = is_broken,
        "Database migrations completed"
    );

    if is_broken {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            hook = "post_migrate",
            "Connection is broken after migrations"
        );
    }

    Ok(())
}
