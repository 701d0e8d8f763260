#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

// Tracing target constants for consistent logging.

/// Tracing target for client-related operations.
///
/// Use this target for logging client initialization, configuration, and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "cdb_postgres::client";

/// Tracing target for database query operations.
///
/// Use this target for logging query execution, results, and query-related errors.
pub const TRACING_TARGET_QUERY: &str = "cdb_postgres::queries";

/// Tracing target for database migration operations.
pub const TRACING_TARGET_MIGRATION: &str = "cdb_postgres::migrations";

/// Tracing target for database connection operations.
///
/// Use this target for logging connection establishment, pool management, and connection errors.
pub const TRACING_TARGET_CONNECTION: &str = "cdb_postgres::connection";

mod client;
mod error;
pub mod model;
pub mod query;
mod schema;
pub mod types;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, PgClient, PgClientMigrationExt, PgConfig,
    PgConn, PooledConnection, run_pending_migrations,
};
pub use crate::error::{BoxError, PgError, PgResult};
