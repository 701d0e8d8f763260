//! Request tracing and request IDs.

use axum::Router;
use axum::http::header::{self, HeaderName};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the request ID in both directions.
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers request tracing and logging.
    ///
    /// Every request gets an `x-request-id` (kept when the client sent one),
    /// a tracing span, and the same id echoed on the response. Credentials
    /// are redacted from logged headers.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(SetSensitiveRequestHeadersLayer::new([
                header::AUTHORIZATION,
                header::COOKIE,
            ]))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::HeaderValue;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn responses_carry_a_request_id() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_observability();
        let server = TestServer::new(app)?;

        let response = server.get("/").await;
        assert!(response.maybe_header(X_REQUEST_ID).is_some());

        let response = server
            .get("/")
            .add_header(X_REQUEST_ID, HeaderValue::from_static("req-42"))
            .await;
        assert_eq!(response.header(X_REQUEST_ID), "req-42");
        Ok(())
    }
}
