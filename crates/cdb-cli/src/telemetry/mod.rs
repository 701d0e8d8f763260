//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;

pub use self::tracing::LogFormat;

/// Initializes the tracing subscriber with the given output format.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    self::tracing::init_tracing(format).context("Failed to initialize tracing")
}
