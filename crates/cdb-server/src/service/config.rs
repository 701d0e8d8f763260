use cdb_postgres::{PgClient, PgClientMigrationExt, PgConfig};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Page size used when a caller omits one.
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    /// Largest page size a caller may request.
    pub const MAX_PAGE_SIZE: i64 = 1000;
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Database connection and pool settings.
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres: PgConfig,

    /// Page size defaults of the listing surfaces.
    #[cfg_attr(feature = "config", command(flatten))]
    pub listing: ListingConfig,
}

impl ServiceConfig {
    /// Creates a configuration for the given database with default listings.
    pub fn new(postgres: PgConfig) -> Self {
        Self {
            postgres,
            listing: ListingConfig::default(),
        }
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> Result<()> {
        self.postgres
            .validate()
            .map_err(|e| Error::config("invalid database configuration").with_source(e))?;
        self.listing.validate()
    }

    /// Connects to Postgres database and runs migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = PgClient::new(self.postgres.clone())
            .map_err(|e| Error::config("failed to create database client").with_source(e))?;

        pg_client.run_pending_migrations().await.map_err(|e| {
            Error::store("run_migrations", "failed to apply database migrations").with_source(e)
        })?;

        Ok(pg_client)
    }
}

/// Page size settings shared by the REST and console listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ListingConfig {
    /// Page size used when a request omits one
    #[cfg_attr(
        feature = "config",
        arg(long, env = "DEFAULT_PAGE_SIZE", default_value_t = defaults::DEFAULT_PAGE_SIZE)
    )]
    pub default_page_size: i64,

    /// Largest page size a request may ask for
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_PAGE_SIZE", default_value_t = defaults::MAX_PAGE_SIZE)
    )]
    pub max_page_size: i64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: defaults::DEFAULT_PAGE_SIZE,
            max_page_size: defaults::MAX_PAGE_SIZE,
        }
    }
}

impl ListingConfig {
    /// Validates the page size bounds.
    pub fn validate(&self) -> Result<()> {
        if self.max_page_size <= 0 {
            return Err(Error::config("max page size must be positive"));
        }

        if !(1..=self.max_page_size).contains(&self.default_page_size) {
            return Err(Error::config(format!(
                "default page size must be between 1 and {}",
                self.max_page_size
            )));
        }

        Ok(())
    }

    /// Resolves the page size of a request.
    ///
    /// Omitted sizes take the default. Sizes above the maximum are rejected;
    /// non-positive ones are left for the listing to reject.
    pub fn page_size(&self, requested: Option<i64>) -> Result<i64> {
        match requested {
            None => Ok(self.default_page_size),
            Some(page_size) if page_size > self.max_page_size => Err(Error::caller(format!(
                "page size must not exceed {}, got {page_size}",
                self.max_page_size
            ))),
            Some(page_size) => Ok(page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn omitted_page_sizes_take_the_default() {
        let config = ListingConfig::default();
        assert_eq!(config.page_size(None).unwrap(), 10);
        assert_eq!(config.page_size(Some(25)).unwrap(), 25);
        assert_eq!(config.page_size(Some(0)).unwrap(), 0);
    }

    #[test]
    fn oversized_pages_are_caller_errors() {
        let config = ListingConfig::default();
        let error = config.page_size(Some(1001)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Caller);
    }

    #[test]
    fn default_must_fit_under_the_maximum() {
        assert!(ListingConfig::default().validate().is_ok());

        let config = ListingConfig {
            default_page_size: 50,
            max_page_size: 20,
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Config);
    }
}
