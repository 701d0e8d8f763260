//! Request types for HTTP handlers.

mod computers;
mod paginations;
mod paths;

pub use computers::*;
pub use paginations::*;
pub use paths::*;
