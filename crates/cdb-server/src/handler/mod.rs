//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use aide::openapi::OpenApi;
//! use cdb_server::handler::routes;
//! use cdb_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let state = ServiceState::from_config(&config).await?;
//!
//! let mut api = OpenApi::default();
//! let router: axum::Router = routes().finish_api(&mut api).with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod companies;
mod computers;
mod error;
mod monitors;
pub mod request;
pub mod response;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(computers::routes())
        .merge(companies::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use aide::openapi::OpenApi;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use jiff::civil;

    use crate::handler::routes;
    use crate::service::{FixedClock, ListingConfig, MemoryStore, ServiceState};

    /// Returns a new [`TestServer`] over an empty in-memory store.
    pub fn create_test_server() -> anyhow::Result<(TestServer, MemoryStore)> {
        let store = MemoryStore::new();
        let clock = Arc::new(FixedClock(civil::date(2024, 6, 1)));
        let state = ServiceState::from_store(store.clone(), ListingConfig::default(), clock);

        let mut api = OpenApi::default();
        let app = routes().finish_api(&mut api).with_state(state);
        let server = TestServer::new(app)?;
        Ok((server, store))
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;
        server
            .get("/printers")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        Ok(())
    }

    #[test]
    fn every_route_is_documented() {
        let mut api = OpenApi::default();
        let _ = routes().finish_api(&mut api);
        let paths: Vec<_> = api
            .paths
            .iter()
            .flat_map(|paths| paths.paths.keys().cloned())
            .collect();
        for path in ["/computers", "/computers/{computerId}", "/companies", "/health"] {
            assert!(paths.iter().any(|p| p == path), "{path} is not documented");
        }
    }
}
