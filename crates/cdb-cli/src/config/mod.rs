//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── service: ServiceConfig   # Database, listing page sizes
//! ├── log_format: LogFormat    # pretty or json
//! └── command: Command         # serve, migrate or a console command
//!     └── serve
//!         ├── server: ServerConfig     # Host, port, timeouts
//!         └── openapi: OpenApiConfig   # Specification and Scalar paths
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod commands;
mod server;

use std::process;

use anyhow::Context;
use cdb_server::service::ServiceConfig;
use clap::Parser;
pub use commands::{
    Command, ComputerArgs, ListComputersArgs, PageArgs, ServeArgs, UpdateComputerArgs,
};
pub use server::ServerConfig;

use crate::TRACING_TARGET_CONFIG;
use crate::telemetry::LogFormat;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "cdb")]
#[command(about = "Computer database server and console")]
#[command(version)]
pub struct Cli {
    /// External service configuration (database, listings).
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Format of log records written to stderr.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so that its
    /// variables act as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.service
            .validate()
            .context("invalid service configuration")?;

        if let Command::Serve(args) = &self.command {
            args.server
                .validate()
                .context("invalid server configuration")?;
        }

        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            postgres_url = %self.service.postgres.database_url_masked(),
            postgres_max_connections = self.service.postgres.postgres_max_connections,
            default_page_size = self.service.listing.default_page_size,
            max_page_size = self.service.listing.max_page_size,
            "Service configuration"
        );

        if let Command::Serve(args) = &self.command {
            args.server.log();
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                openapi_path = %args.openapi.open_api_json,
                scalar_path = %args.openapi.scalar_ui,
                "OpenAPI configuration"
            );
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let base = ["cdb", "--postgres-url", "postgresql://localhost/cdb"];
        Cli::parse_from(base.iter().chain(args))
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_console_commands() {
        let cli = parse(&["delete-computer", "3", "4"]);
        assert!(matches!(cli.command, Command::DeleteComputer { ref ids } if ids == &[3, 4]));

        let cli = parse(&["add-computer", "--name", "Apple II", "--introduced", "01/04/1977"]);
        let Command::AddComputer(args) = cli.command else {
            panic!("expected add-computer");
        };
        assert_eq!(args.introduced, Some(jiff::civil::date(1977, 4, 1)));
    }

    #[test]
    fn rejects_iso_dates_on_the_console() {
        let base = ["cdb", "--postgres-url", "postgresql://localhost/cdb"];
        let args = ["add-computer", "--name", "Lisa", "--introduced", "1983-01-19"];
        assert!(Cli::try_parse_from(base.iter().chain(args.iter())).is_err());
    }
}
