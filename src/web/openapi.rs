//! OpenAPI document for the file API.

use axum::Json;
use utoipa::OpenApi;

use super::dto::{
    CrashResponse, DeleteResponse, FileEntryResponse, FileListResponse, InfoResponse,
    StatsResponse, UploadResponse,
};
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "efs-files", description = "Shared-volume file service"),
    paths(
        handlers::info::health_check,
        handlers::info::get_info,
        handlers::files::list_files,
        handlers::files::download_file,
        handlers::files::upload_file,
        handlers::files::write_message,
        handlers::files::delete_file,
        handlers::files::get_stats,
        handlers::page::crash,
    ),
    components(schemas(
        InfoResponse,
        FileEntryResponse,
        FileListResponse,
        UploadResponse,
        DeleteResponse,
        StatsResponse,
        CrashResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "info", description = "Task identity and mount status"),
        (name = "files", description = "Files on the shared volume"),
        (name = "demo", description = "Workshop demonstrations")
    )
)]
pub struct ApiDoc;

/// GET /api/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
