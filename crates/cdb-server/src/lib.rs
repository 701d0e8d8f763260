#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

// Tracing target constants for consistent logging.

/// Tracing target for the listing service.
pub const TRACING_TARGET_LISTING: &str = "cdb_server::service::listing";

/// Tracing target for catalog operations.
pub const TRACING_TARGET_CATALOG: &str = "cdb_server::service::catalog";

/// Tracing target for store implementations.
pub const TRACING_TARGET_STORE: &str = "cdb_server::service::store";
