//! Request extractors with improved error handling and validation.
//!
//! Drop-in replacements for the axum extractors whose rejections are turned
//! into the API's JSON [`Error`] responses and documented through `aide`.
//!
//! - [`Json`] - JSON deserialization with readable rejections
//! - [`ValidateJson`] - JSON extraction followed by `validator` checks
//! - [`Path`] - Path parameter extraction
//! - [`Query`] - Query string extraction
//!
//! [`Error`]: crate::handler::Error

pub mod reject;

pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
