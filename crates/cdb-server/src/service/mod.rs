//! Catalog services and application state.

mod catalog;
mod computer_draft;
mod config;
mod listing;
pub mod store;
pub mod validation;

use std::sync::Arc;

pub use crate::service::catalog::{Catalog, Validated};
pub use crate::service::computer_draft::ComputerDraft;
pub use crate::service::config::{ListingConfig, ServiceConfig};
pub use crate::service::listing::{ListingRequest, ListingService};
#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub use crate::service::store::MemoryStore;
pub use crate::service::store::{CompanyStore, ComputerStore, PgStore};
pub use crate::service::validation::{
    Clock, ComputerValidator, FixedClock, SystemClock, ValidationResult,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub catalog: Catalog,
    pub listing: ListingConfig,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the database and applies pending migrations.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        service_config.validate()?;
        let pg_client = service_config.connect_postgres().await?;

        Ok(Self::from_store(
            PgStore::new(pg_client),
            service_config.listing,
            Arc::new(SystemClock),
        ))
    }

    /// Initializes application state over a single store serving both
    /// computers and companies.
    pub fn from_store<S>(store: S, listing: ListingConfig, clock: Arc<dyn Clock>) -> Self
    where
        S: ComputerStore + CompanyStore + Clone + 'static,
    {
        let catalog = Catalog::new(Arc::new(store.clone()), Arc::new(store), clock);
        Self { catalog, listing }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(catalog: Catalog);
impl_di!(listing: ListingConfig);
