//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Observability: tracing spans and request IDs
//! - Recovery: panics, timeouts and middleware errors
//! - OpenAPI documentation with the Scalar UI
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aide::axum::ApiRouter;
//! use axum::Router;
//! use cdb_server::middleware::{
//!     OpenApiConfig, RecoveryConfig, RouterObservabilityExt, RouterOpenApiExt,
//!     RouterRecoveryExt,
//! };
//!
//! let app: Router<()> = ApiRouter::new()
//!     .with_open_api(OpenApiConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod specification;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
