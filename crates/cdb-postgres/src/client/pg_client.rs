use std::fmt;
use std::time::{Duration, Instant};

use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::AsyncConnection;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::scoped_futures::ScopedBoxFuture;

use super::custom_hooks;
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CLIENT,
    TRACING_TARGET_CONNECTION,
};

/// Checkouts slower than this are logged as a warning.
const SLOW_ACQUIRE_THRESHOLD: Duration = Duration::from_millis(100);

/// Handle to the catalog database.
///
/// Clones share one connection pool.
#[derive(Clone)]
pub struct PgClient {
    pool: ConnectionPool,
    max_connections: u32,
}

impl PgClient {
    /// Builds the connection pool described by `config`.
    ///
    /// No connection is opened until the first checkout.
    ///
    /// # Errors
    ///
    /// Fails when deadpool rejects the pool settings.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CLIENT,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(custom_hooks::setup_callback);
        let manager =
            AsyncDieselConnectionManager::new_with_config(&config.postgres_url, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(custom_hooks::post_create))
            .pre_recycle(Hook::sync_fn(custom_hooks::pre_recycle))
            .post_recycle(Hook::sync_fn(custom_hooks::post_recycle))
            .build()
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CLIENT, error = %e, "Cannot build the catalog pool");
                PgError::Unexpected(format!("invalid connection pool settings: {e}").into())
            })?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            max_connections = config.postgres_max_connections,
            "Catalog pool ready"
        );

        Ok(Self {
            pool,
            max_connections: config.postgres_max_connections,
        })
    }

    /// Checks a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Fails when no connection frees up before the wait timeout.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_CONNECTION)]
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = Instant::now();
        let conn = self.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                elapsed = ?start.elapsed(),
                "Catalog connection checkout failed"
            );
            PgError::from(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > SLOW_ACQUIRE_THRESHOLD {
            tracing::warn!(target: TRACING_TARGET_CONNECTION, elapsed = ?elapsed, "Slow catalog connection checkout");
        }

        Ok(PgConn { conn })
    }

    pub(crate) async fn get_pooled_connection(&self) -> PgResult<PooledConnection> {
        self.pool.get().await.map_err(PgError::from)
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.pool.status();
        f.debug_struct("PgClient")
            .field("max_connections", &self.max_connections)
            .field("open", &status.size)
            .field("idle", &status.available)
            .finish()
    }
}

/// Pooled connection on which the repository traits are called.
///
/// Goes back to the pool on drop.
///
/// ```ignore
/// let mut conn = client.get_connection().await?;
/// let computer = conn.find_computer_by_id(42).await?;
/// ```
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Runs `f` in a transaction, committing on `Ok` and rolling back on `Err`.
    pub async fn transaction<'a, T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: for<'r> FnOnce(&'r mut PooledConnection) -> ScopedBoxFuture<'a, 'r, Result<T, E>>
            + Send
            + 'a,
        T: Send + 'a,
        E: From<diesel::result::Error> + Send + 'a,
    {
        self.conn.transaction(f).await
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
