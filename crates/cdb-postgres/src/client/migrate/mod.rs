//! Database migration management.
//!
//! Migrations are embedded into the binary and applied through
//! [`run_pending_migrations`] or the [`PgClientMigrationExt`] extension trait.

mod client_ext;
mod custom_hooks;
mod migrate_result;
mod run_migration;
mod run_utility;

pub use client_ext::PgClientMigrationExt;
pub use migrate_result::MigrationResult;
pub(crate) use migrate_result::MigrationStatus;
pub use run_migration::run_pending_migrations;
pub(crate) use run_utility::get_migration_status;
