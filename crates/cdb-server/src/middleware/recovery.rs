//! Recovery middleware for handling errors, panics, and timeouts.

use std::any::Any;
use std::future::ready;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

/// Tracing target for error recovery.
const TRACING_TARGET_ERROR: &str = "cdb_server::middleware::recovery::error";

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "cdb_server::middleware::recovery::panic";

type ResponseFut = BoxFuture<'static, Response>;
type Panic = Box<dyn Any + Send + 'static>;

/// Configuration for recovery middleware behavior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Maximum time to wait for a request to complete before it is answered
    /// with `504 Gateway Timeout`.
    pub request_timeout: Duration,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }
}

impl RecoveryConfig {
    /// Creates a new configuration with the given request timeout.
    pub const fn with_timeout(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Layers recovery middleware with the provided configuration.
    ///
    /// This middleware stack handles request timeouts, panics in handlers,
    /// and Tower service errors, converting them to error responses.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .layer(CatchPanicLayer::custom(catch_panic))
            .layer(TimeoutLayer::new(config.request_timeout));

        self.layer(middlewares)
    }
}

fn handle_error(err: tower::BoxError) -> ResponseFut {
    use tower::timeout::error::Elapsed;

    let error = if err.is::<Elapsed>() {
        tracing::error!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "request timeout exceeded"
        );

        Error::new(ErrorKind::GatewayTimeout)
            .with_context("The request took too long to process and was terminated")
    } else {
        tracing::error!(
            target: TRACING_TARGET_ERROR,
            error = %err,
            "unknown middleware error"
        );

        Error::new(ErrorKind::InternalServerError)
            .with_message("An unexpected error occurred")
            .with_context(err.to_string())
    };

    ready(error.into_response()).boxed()
}

fn catch_panic(err: Panic) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = %message,
        "service panic"
    );

    Error::new(ErrorKind::InternalServerError)
        .with_message("An unexpected panic occurred")
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "late"
    }

    async fn broken() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn slow_requests_time_out() -> anyhow::Result<()> {
        let config = RecoveryConfig::with_timeout(Duration::from_millis(20));
        let app = Router::new().route("/", get(slow)).with_recovery(&config);
        let server = TestServer::new(app)?;

        server.get("/").await.assert_status(StatusCode::GATEWAY_TIMEOUT);
        Ok(())
    }

    #[tokio::test]
    async fn panics_become_internal_errors() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/", get(broken))
            .with_recovery(&RecoveryConfig::default());
        let server = TestServer::new(app)?;

        server
            .get("/")
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        Ok(())
    }
}
