//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    crash, delete_file, download_file, get_info, get_stats, health_check, index, list_files,
    upload_file, write_message, AppState,
};
use super::middleware::create_cors_layer;
use super::openapi::openapi_json;
use crate::config::WebConfig;

/// Create the main router.
///
/// Wrong methods on known paths are answered with 405 by the method routers.
pub fn create_router(app_state: Arc<AppState>, web_config: &WebConfig) -> Router {
    let mut api_routes = Router::new()
        .route("/info", get(get_info))
        .route("/files", get(list_files))
        .route("/files/:name", get(download_file))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(app_state.max_upload_size)),
        )
        .route("/write", post(write_message))
        .route("/delete", delete(delete_file))
        .route("/stats", get(get_stats))
        .route("/openapi.json", get(openapi_json));

    if app_state.crash_delay.is_some() {
        api_routes = api_routes.route("/crash", post(crash));
    }

    Router::new()
        .route("/", get(index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new(&web_config.static_path))
        .with_state(app_state)
        .merge(create_health_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(&web_config.cors_origins)),
        )
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}
