//! Tracing initialization and configuration.

use std::io;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format of log records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, colored lines.
    #[default]
    Pretty,
    /// One JSON object per record.
    Json,
}

/// Initializes the tracing subscriber for structured logging.
///
/// Records go to stderr so that console output stays clean. The log level
/// can be configured via the `RUST_LOG` environment variable and defaults
/// to `info`.
///
/// ```bash
/// RUST_LOG=debug cdb serve
/// RUST_LOG=cdb_server=trace,tower_http=debug cdb serve
/// ```
pub(super) fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_level(true)
                    .with_ansi(true)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
}

/// Creates an environment filter for tracing.
fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))
}
