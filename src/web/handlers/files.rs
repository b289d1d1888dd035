//! File handlers: list, download, upload, write, delete and stats.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::web::dto::{
    DeleteQuery, DeleteResponse, FileListResponse, StatsResponse, UploadResponse, WriteQuery,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

/// Client name for files created by `/api/write`.
const MESSAGE_FILE: &str = "message.txt";

const DEFAULT_MESSAGE: &str = "default message";

/// Build a Content-Disposition header value for `filename`.
///
/// Quotes, backslashes and control characters never reach the quoted
/// parameter; non-ASCII names also get an RFC 5987 `filename*`.
fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename.chars().any(|c| c.is_control() || c == '"' || c == '\\');
    if !needs_encoding {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::bad_request("file too large")
    } else {
        tracing::warn!("Failed to read multipart body: {}", e);
        ApiError::bad_request(e.body_text())
    }
}

/// GET /api/files - List files in the uploads directory.
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "Visible files", body = FileListResponse),
        (status = 500, description = "Uploads directory could not be read")
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.store.list().await?;

    Ok(Json(FileListResponse {
        task_id: state.identity.current(),
        files: files.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/files/{name} - Download a file.
#[utoipa::path(
    get,
    path = "/api/files/{name}",
    tag = "files",
    params(("name" = String, Path, description = "Stored file name")),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Invalid file name"),
        (status = 404, description = "File not found"),
        (status = 500, description = "File could not be read")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let (name, content) = state.store.read(&name).await?;

    let content_type = mime_guess::from_path(&name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, content_disposition_header(&name))
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build download response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// POST /api/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" field. The field is
/// streamed to disk; a body over the cap removes the partial file.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "files",
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file field, invalid name or file too large"),
        (status = 409, description = "Stored name already taken"),
        (status = 500, description = "File could not be written")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let client_name = field.file_name().unwrap_or_default().to_string();
        let mut upload = state.store.begin_upload(&client_name, Utc::now()).await?;

        loop {
            match field.chunk().await {
                Ok(Some(chunk)) => {
                    if let Err(e) = upload.write(&chunk).await {
                        upload.abort().await;
                        return Err(e.into());
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    upload.abort().await;
                    return Err(multipart_error(e));
                }
            }
        }

        let stored = upload.finish().await?;
        tracing::info!(
            filename = %stored.name,
            size = stored.size,
            "Stored upload"
        );

        return Ok(Json(UploadResponse {
            success: true,
            filename: stored.name,
            task_id: state.identity.current(),
        }));
    }

    Err(ApiError::bad_request("missing file field"))
}

/// POST /api/write?msg=TEXT - Store a short text message as a new file.
#[utoipa::path(
    post,
    path = "/api/write",
    tag = "files",
    params(WriteQuery),
    responses(
        (status = 200, description = "Message stored", body = UploadResponse),
        (status = 409, description = "Stored name already taken"),
        (status = 500, description = "File could not be written")
    )
)]
pub async fn write_message(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WriteQuery>,
) -> Result<Json<UploadResponse>, ApiError> {
    let message = query
        .msg
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

    let stored = state
        .store
        .save(MESSAGE_FILE, message.as_bytes(), Utc::now())
        .await?;
    tracing::info!(filename = %stored.name, size = stored.size, "Wrote message");

    Ok(Json(UploadResponse {
        success: true,
        filename: stored.name,
        task_id: state.identity.current(),
    }))
}

/// DELETE /api/delete?file=NAME - Delete a file.
#[utoipa::path(
    delete,
    path = "/api/delete",
    tag = "files",
    params(DeleteQuery),
    responses(
        (status = 200, description = "File deleted", body = DeleteResponse),
        (status = 400, description = "Missing or invalid file parameter"),
        (status = 404, description = "File not found"),
        (status = 500, description = "File could not be removed")
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let requested = query
        .file
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing file parameter"))?;

    let deleted = state.store.delete(&requested).await?;
    tracing::info!(filename = %deleted, "Deleted file");

    Ok(Json(DeleteResponse {
        success: true,
        task_id: state.identity.current(),
    }))
}

/// GET /api/stats - File count and total size.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "files",
    responses(
        (status = 200, description = "Directory statistics", body = StatsResponse),
        (status = 500, description = "Uploads directory could not be read")
    )
)]
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.store.stats().await?;

    Ok(Json(StatsResponse::new(state.identity.current(), stats)))
}
