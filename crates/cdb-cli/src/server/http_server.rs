//! HTTP server startup and lifecycle management.

use std::future::{IntoFuture, pending};
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::{
    ServerError, ServerResult, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP, shutdown_signal,
};
use crate::config::ServerConfig;

/// Starts an HTTP server with graceful shutdown.
///
/// After a shutdown signal, in-flight requests get up to the configured
/// shutdown timeout to finish before the server stops waiting for them.
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::invalid_config(&validation_error));
    }

    let server_addr = server_config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %server_addr,
            error = %err,
            "Failed to bind to address"
        );

        ServerError::BindError {
            address: server_addr.to_string(),
            source: err,
        }
    })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let (signalled, on_signal) = oneshot::channel();
    let graceful = async move {
        shutdown_signal().await;
        let _ = signalled.send(());
    };

    let shutdown_timeout = server_config.shutdown_timeout();
    let deadline = async move {
        match on_signal.await {
            Ok(()) => tokio::time::sleep(shutdown_timeout).await,
            Err(_) => pending::<()>().await,
        }
    };

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful)
    .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %err,
                    "Server encountered an error"
                );
                ServerError::Runtime(err)
            })?;
            tracing::info!(target: TRACING_TARGET_SHUTDOWN, "Server shut down gracefully");
        }
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                timeout_secs = shutdown_timeout.as_secs(),
                "Shutdown timeout elapsed, dropping in-flight requests"
            );
        }
    }

    Ok(())
}
