#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod console;
mod server;
mod telemetry;

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use axum::Router;
use cdb_postgres::{PgClient, PgClientMigrationExt};
use cdb_server::handler::routes;
use cdb_server::middleware::{
    OpenApiConfig, RecoveryConfig, RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt,
};
use cdb_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, Command, ServeArgs};
use crate::console::{Console, Status};
use crate::server::ServerError;

// Tracing target constants
pub const TRACING_TARGET_CONFIG: &str = "cdb_cli::config";
pub const TRACING_TARGET_MIGRATIONS: &str = "cdb_cli::migrations";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(Status::Done) => ExitCode::SUCCESS,
        Ok(Status::Rejected) => ExitCode::from(2),
        Err(error) => {
            if tracing::enabled!(tracing::Level::ERROR) {
                tracing::error!(
                    target: server::TRACING_TARGET_SHUTDOWN,
                    error = %error,
                    "application terminated with error"
                );
            }

            eprintln!("Error: {error:#}");
            if let Some(suggestion) = error
                .downcast_ref::<ServerError>()
                .and_then(ServerError::suggestion)
            {
                eprintln!("Hint: {suggestion}");
            }

            ExitCode::FAILURE
        }
    }
}

/// Main application entry point.
async fn run() -> anyhow::Result<Status> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.log_format)?;
    cli.log();
    cli.validate()?;

    match cli.command {
        Command::Serve(args) => serve(&cli.service, args).await,
        Command::Migrate => migrate(&cli.service).await,
        command => {
            let state = create_service_state(&cli.service).await?;
            let mut console = Console::new(state.catalog, state.listing, io::stdout());
            console.run(command).await
        }
    }
}

/// Creates the service state from configuration.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("failed to create service state")
}

/// Serves the JSON API until a shutdown signal arrives.
async fn serve(config: &ServiceConfig, args: ServeArgs) -> anyhow::Result<Status> {
    let state = create_service_state(config).await?;
    let router = create_router(state, args.openapi, &args.server.recovery());

    server::serve_http(router, args.server).await?;
    Ok(Status::Done)
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Routes (innermost) - handlers and the OpenAPI documentation
fn create_router(state: ServiceState, openapi: OpenApiConfig, recovery: &RecoveryConfig) -> Router {
    routes()
        .with_open_api(openapi)
        .with_state(state)
        .with_observability()
        .with_recovery(recovery)
}

/// Applies pending migrations and prints what was applied.
async fn migrate(config: &ServiceConfig) -> anyhow::Result<Status> {
    let client = PgClient::new(config.postgres.clone()).context("failed to create database client")?;
    let result = client
        .run_pending_migrations()
        .await
        .context("failed to apply database migrations")?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATIONS,
        applied = result.applied_count(),
        duration_ms = result.duration.as_millis() as u64,
        "Migrations applied"
    );

    if result.processed_versions.is_empty() {
        println!("Database schema is up to date");
    }
    for version in &result.processed_versions {
        println!("Applied migration {version}");
    }

    Ok(Status::Done)
}
