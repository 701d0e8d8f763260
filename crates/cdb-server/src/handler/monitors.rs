//! Liveness handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::response::MonitorStatus;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "cdb_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status() -> (StatusCode, Json<MonitorStatus>) {
    let status = MonitorStatus::default();
    tracing::trace!(target: TRACING_TARGET, version = %status.version, "Health status checked");
    (StatusCode::OK, Json(status))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Get health status")
        .description("Reports that the server is up, with its version.")
        .response::<200, Json<MonitorStatus>>()
}

/// Returns a [`Router`] with the health route.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Health"))
}
