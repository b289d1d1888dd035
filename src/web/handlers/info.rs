//! Health and task information handlers.

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::InfoResponse;

/// Status reported when the uploads directory is present.
pub const STATUS_MOUNTED: &str = "MOUNTED ✓";
/// Status reported otherwise.
pub const STATUS_NOT_MOUNTED: &str = "NOT MOUNTED";

/// GET /health - Liveness check for the load balancer.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = String, content_type = "text/plain")
    )
)]
pub async fn health_check() -> &'static str {
    "ok"
}

/// GET /api/info - Task identity and mount status.
///
/// Never fails: a volume that cannot be inspected is reported as not mounted.
#[utoipa::path(
    get,
    path = "/api/info",
    tag = "info",
    responses(
        (status = 200, description = "Task information", body = InfoResponse)
    )
)]
pub async fn get_info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    let status = if state.store.is_mounted().await {
        STATUS_MOUNTED
    } else {
        STATUS_NOT_MOUNTED
    };

    Json(InfoResponse {
        task_id: state.identity.current(),
        efs_mount: state.mount_path.clone(),
        efs_status: status.to_string(),
    })
}
