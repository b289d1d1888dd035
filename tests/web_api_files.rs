//! Web API File Tests
//!
//! Integration tests for the info, list, download, upload, write, delete and
//! stats endpoints.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use efs_files::config::WebConfig;
use efs_files::web::handlers::AppState;
use efs_files::web::router::create_router;
use efs_files::{FileStore, TaskIdentity};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const TASK_ID: &str = "task-under-test";

/// Create a test server whose uploads directory is `uploads`.
fn create_test_server_at(uploads: &Path, max_upload_size: usize) -> TestServer {
    create_test_server_with_prefix(uploads, max_upload_size, ".")
}

fn create_test_server_with_prefix(
    uploads: &Path,
    max_upload_size: usize,
    hidden_prefix: &str,
) -> TestServer {
    let state = AppState::new(
        FileStore::new(uploads, hidden_prefix),
        TaskIdentity::new(Some(TASK_ID.to_string())),
        "/mnt/efs",
    )
    .with_max_upload_size(max_upload_size);

    let router = create_router(Arc::new(state), &WebConfig::default());
    TestServer::new(router).expect("Failed to create test server")
}

/// Create a test server with an existing, empty uploads directory.
fn create_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server_at(temp_dir.path(), 10 * 1024 * 1024);
    (server, temp_dir)
}

fn file_form(file_name: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content.to_vec())
            .file_name(file_name)
            .mime_type("application/octet-stream"),
    )
}

async fn upload(server: &TestServer, file_name: &str, content: &[u8]) -> String {
    let response = server
        .post("/api/upload")
        .multipart(file_form(file_name, content))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["filename"].as_str().unwrap().to_string()
}

async fn list(server: &TestServer) -> Vec<Value> {
    let response = server.get("/api/files").await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["files"].as_array().unwrap().clone()
}

fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Health / Info Tests
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (server, _dir) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "ok");
}

#[tokio::test]
async fn test_info_mounted() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/info").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["taskId"], TASK_ID);
    assert_eq!(body["efsMount"], "/mnt/efs");
    assert_eq!(body["efsStatus"], "MOUNTED ✓");
}

#[tokio::test]
async fn test_info_not_mounted() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server_at(&temp_dir.path().join("missing"), 1024);

    let response = server.get("/api/info").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["efsStatus"], "NOT MOUNTED");
}

#[tokio::test]
async fn test_index_page() {
    let (server, _dir) = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    assert!(response.text().contains("/api/upload"));
}

// ============================================================================
// List Tests
// ============================================================================

#[tokio::test]
async fn test_list_empty() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/files").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["taskId"], TASK_ID);
    assert_eq!(body["files"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_missing_directory_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server_at(&temp_dir.path().join("not-yet-created"), 1024);

    assert!(list(&server).await.is_empty());
}

#[tokio::test]
async fn test_list_skips_hidden_files() {
    let (server, dir) = create_test_server();
    std::fs::write(dir.path().join(".DS_Store"), b"junk").unwrap();
    std::fs::write(dir.path().join("seeded.txt"), b"hello").unwrap();

    let files = list(&server).await;

    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "seeded.txt");
    assert_eq!(files[0]["size"], 5);
    assert!(files[0]["modified"].as_str().unwrap().ends_with('Z'));
}

// ============================================================================
// Download Tests
// ============================================================================

#[tokio::test]
async fn test_download_uploaded_file() {
    let (server, _dir) = create_test_server();
    let filename = upload(&server, "notes.txt", b"read me back").await;

    let response = server.get(&format!("/api/files/{}", filename)).await;

    response.assert_status_ok();
    assert_eq!(&response.as_bytes()[..], b"read me back");
    assert_eq!(response.header("content-type"), "text/plain");
    assert_eq!(
        response.header("content-disposition"),
        format!("attachment; filename=\"{}\"", filename).as_str()
    );
}

#[tokio::test]
async fn test_download_unknown_type_is_octet_stream() {
    let (server, dir) = create_test_server();
    std::fs::write(dir.path().join("blob_1.zzzunknown"), [0u8, 1, 2]).unwrap();

    let response = server.get("/api/files/blob_1.zzzunknown").await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/octet-stream");
}

#[tokio::test]
async fn test_download_not_found() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/files/never_uploaded.txt").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("never_uploaded.txt"));
}

#[tokio::test]
async fn test_download_hidden_file_is_not_found() {
    let (server, dir) = create_test_server();
    std::fs::write(dir.path().join(".secret"), b"hidden").unwrap();

    let response = server.get("/api/files/.secret").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_download_traversal_stays_inside() {
    let temp_dir = TempDir::new().unwrap();
    let uploads = temp_dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    std::fs::write(temp_dir.path().join("victim.txt"), b"outside").unwrap();
    let server = create_test_server_at(&uploads, 1024);

    let response = server.get("/api/files/..%2Fvictim.txt").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(!response.text().contains("outside"));
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_then_list() {
    let (server, _dir) = create_test_server();
    let content = b"shared across tasks";

    let response = server
        .post("/api/upload")
        .multipart(file_form("notes.txt", content))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["taskId"], TASK_ID);

    let filename = body["filename"].as_str().unwrap();
    let suffix = filename
        .strip_prefix("notes_")
        .and_then(|rest| rest.strip_suffix(".txt"))
        .expect("stored name keeps base name and extension");
    assert!(suffix.parse::<u64>().is_ok());

    let files = list(&server).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], filename);
    assert_eq!(files[0]["size"], content.len() as u64);
}

#[tokio::test]
async fn test_upload_replaces_spaces() {
    let (server, _dir) = create_test_server();

    let filename = upload(&server, "quarterly report.pdf", b"%PDF").await;

    assert!(filename.starts_with("quarterly_report_"));
    assert!(filename.ends_with(".pdf"));
}

#[tokio::test]
async fn test_upload_with_custom_hidden_prefix_is_listed() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server_with_prefix(dir.path(), 1024 * 1024, "_");

    let filename = upload(&server, "_draft.txt", b"draft").await;

    assert!(filename.starts_with("draft_"));
    let files = list(&server).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], filename.as_str());
}

#[tokio::test]
async fn test_upload_traversal_stays_inside() {
    let temp_dir = TempDir::new().unwrap();
    let uploads: PathBuf = temp_dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let server = create_test_server_at(&uploads, 1024 * 1024);

    let filename = upload(&server, "../../escape.txt", b"x").await;

    assert!(filename.starts_with("escape_"));
    assert!(uploads.join(&filename).is_file());
    assert_eq!(dir_names(temp_dir.path()), vec!["uploads"]);
}

#[tokio::test]
async fn test_upload_too_large() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server_at(dir.path(), 1024);

    let response = server
        .post("/api/upload")
        .multipart(file_form("big.bin", &vec![0xAB; 8 * 1024]))
        .await;

    assert!(response.status_code().is_client_error());
    let body: Value = response.json();
    assert!(body["error"].is_string());
    assert!(dir_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new().add_text("description", "no file here");
    let response = server.post("/api/upload").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "missing file field");
}

#[tokio::test]
async fn test_upload_invalid_filename() {
    let (server, dir) = create_test_server();

    let response = server
        .post("/api/upload")
        .multipart(file_form("../", b"x"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(dir_names(dir.path()).is_empty());
}

#[tokio::test]
async fn test_upload_into_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server_at(&temp_dir.path().join("missing"), 1024 * 1024);

    let response = server
        .post("/api/upload")
        .multipart(file_form("a.txt", b"x"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("I/O error"));
}

#[tokio::test]
async fn test_upload_wrong_method() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/upload").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Write Tests
// ============================================================================

#[tokio::test]
async fn test_write_message_then_download() {
    let (server, _dir) = create_test_server();

    let response = server
        .post("/api/write")
        .add_query_param("msg", "hello from a task")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["taskId"], TASK_ID);
    let filename = body["filename"].as_str().unwrap().to_string();
    assert!(filename.starts_with("message_"));
    assert!(filename.ends_with(".txt"));

    let files = list(&server).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], filename.as_str());

    let response = server.get(&format!("/api/files/{}", filename)).await;
    assert_eq!(response.text(), "hello from a task");
}

#[tokio::test]
async fn test_write_default_message() {
    let (server, dir) = create_test_server();

    let response = server.post("/api/write").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let filename = body["filename"].as_str().unwrap();
    let content = std::fs::read_to_string(dir.path().join(filename)).unwrap();
    assert_eq!(content, "default message");
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_removes_from_list() {
    let (server, _dir) = create_test_server();
    let filename = upload(&server, "temp.txt", b"bye").await;
    assert_eq!(list(&server).await.len(), 1);

    let response = server
        .delete("/api/delete")
        .add_query_param("file", &filename)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["taskId"], TASK_ID);
    assert!(list(&server).await.is_empty());
}

#[tokio::test]
async fn test_delete_not_found() {
    let (server, _dir) = create_test_server();

    let response = server
        .delete("/api/delete")
        .add_query_param("file", "never_uploaded.txt")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("never_uploaded.txt"));
}

#[tokio::test]
async fn test_delete_missing_parameter() {
    let (server, _dir) = create_test_server();

    let response = server.delete("/api/delete").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "missing file parameter");
}

#[tokio::test]
async fn test_delete_traversal_stays_inside() {
    let temp_dir = TempDir::new().unwrap();
    let uploads = temp_dir.path().join("uploads");
    std::fs::create_dir(&uploads).unwrap();
    let victim = temp_dir.path().join("victim.txt");
    std::fs::write(&victim, b"keep me").unwrap();
    let server = create_test_server_at(&uploads, 1024);

    let response = server
        .delete("/api/delete")
        .add_query_param("file", "../victim.txt")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(victim.exists());
}

#[tokio::test]
async fn test_delete_wrong_method() {
    let (server, _dir) = create_test_server();

    let response = server.post("/api/delete").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Stats / Misc Tests
// ============================================================================

#[tokio::test]
async fn test_stats() {
    let (server, _dir) = create_test_server();
    upload(&server, "one.txt", b"12345").await;
    upload(&server, "two.txt", b"123").await;

    let response = server.get("/api/stats").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["taskId"], TASK_ID);
    assert_eq!(body["files"], 2);
    assert_eq!(body["totalSize"], 8);
}

#[tokio::test]
async fn test_crash_disabled_by_default() {
    let (server, _dir) = create_test_server();

    let response = server.post("/api/crash").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document() {
    let (server, _dir) = create_test_server();

    let response = server.get("/api/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/upload"].is_object());
}

#[tokio::test]
async fn test_static_assets() {
    let uploads = TempDir::new().unwrap();
    let assets = TempDir::new().unwrap();
    std::fs::write(assets.path().join("app.css"), "body {}").unwrap();

    let state = AppState::new(
        FileStore::new(uploads.path(), "."),
        TaskIdentity::new(Some(TASK_ID.to_string())),
        "/mnt/efs",
    );
    let web_config = WebConfig {
        static_path: assets.path().display().to_string(),
        ..WebConfig::default()
    };
    let server = TestServer::new(create_router(Arc::new(state), &web_config)).unwrap();

    let response = server.get("/static/app.css").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "body {}");
}
