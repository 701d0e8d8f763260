use diesel::migration::MigrationSource;
use diesel::pg::Pg;
use diesel::sql_query;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::MigrationStatus;
use crate::{MIGRATIONS, PgError, PgResult, TRACING_TARGET_MIGRATION};

#[derive(diesel::QueryableByName)]
struct ExistsResult {
    #[diesel(sql_type = diesel::sql_types::Bool)]
    exists: bool,
}

#[derive(diesel::QueryableByName)]
struct MigrationVersion {
    #[diesel(sql_type = diesel::sql_types::Text)]
    version: String,
}

/// Returns the versions of every migration embedded in the binary.
fn embedded_versions() -> PgResult<Vec<String>> {
    let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(PgError::Migration)?;
    Ok(migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .collect())
}

async fn migration_table_exists(conn: &mut AsyncPgConnection) -> PgResult<bool> {
    let result = sql_query(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_name = '__diesel_schema_migrations'
         ) as exists",
    )
    .get_result::<ExistsResult>(conn)
    .await
    .map_err(|e| PgError::Migration(format!("Failed to check migration table: {}", e).into()))?;

    Ok(result.exists)
}

/// Gets the current migration status of the database.
///
/// A database that was never migrated reports every embedded migration as
/// pending.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub(crate) async fn get_migration_status(conn: &mut AsyncPgConnection) -> PgResult<MigrationStatus> {
    let applied_versions = if migration_table_exists(conn).await? {
        get_applied_migrations(conn).await?
    } else {
        Vec::new()
    };

    let pending_versions: Vec<String> = embedded_versions()?
        .into_iter()
        .filter(|version| !applied_versions.contains(version))
        .collect();

    let status = MigrationStatus::new(applied_versions, pending_versions);

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        applied_count = status.applied_migrations(),
        pending_count = status.pending_migrations(),
        "Migration status retrieved"
    );

    Ok(status)
}

/// Gets the applied migration versions, oldest first.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
async fn get_applied_migrations(conn: &mut AsyncPgConnection) -> PgResult<Vec<String>> {
    let versions = sql_query("SELECT version FROM __diesel_schema_migrations ORDER BY version")
        .get_results::<MigrationVersion>(conn)
        .await
        .map_err(|e| PgError::Migration(format!("Failed to get applied migrations: {}", e).into()))?
        .into_iter()
        .map(|row| row.version)
        .collect();

    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_migrations_are_listed() {
        let versions = embedded_versions().expect("embedded migrations should load");
        assert_eq!(versions.len(), 1);
        assert!(versions[0].starts_with("2025"));
    }
}
