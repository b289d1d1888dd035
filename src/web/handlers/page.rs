//! Browser UI and the crash demo.

use axum::{extract::State, response::Html, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::CrashResponse;
use crate::web::error::ApiError;

const INDEX_HTML: &str = include_str!("../../../static/index.html");

/// GET / - Browser UI for the file API.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /api/crash - Exit the process after the configured delay.
///
/// Lets students watch the orchestrator replace a failed task while the
/// files on the shared volume survive.
#[utoipa::path(
    post,
    path = "/api/crash",
    tag = "demo",
    responses(
        (status = 200, description = "Exit scheduled", body = CrashResponse),
        (status = 404, description = "Crash endpoint disabled")
    )
)]
pub async fn crash(State(state): State<Arc<AppState>>) -> Result<Json<CrashResponse>, ApiError> {
    let delay = state
        .crash_delay
        .ok_or_else(|| ApiError::not_found("crash endpoint disabled"))?;

    let task_id = state.identity.current();
    tracing::warn!(task_id = %task_id, "Exiting in {}s on request", delay.as_secs());

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        std::process::exit(1);
    });

    Ok(Json(CrashResponse {
        success: true,
        task_id,
        exit_in_secs: delay.as_secs(),
    }))
}
