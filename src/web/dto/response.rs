//! Response DTOs for the Web API.
//!
//! Field names follow the browser UI's camelCase JSON.

use serde::Serialize;
use utoipa::ToSchema;

use crate::file::{DirectoryStats, FileEntry};

/// Response of `GET /api/info`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    /// Task that served the request.
    pub task_id: String,
    /// Configured mount path of the shared volume.
    pub efs_mount: String,
    /// `"MOUNTED ✓"` or `"NOT MOUNTED"`.
    pub efs_status: String,
}

/// A listed file.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileEntryResponse {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Modification time (RFC 3339, UTC).
    pub modified: String,
}

impl From<FileEntry> for FileEntryResponse {
    fn from(entry: FileEntry) -> Self {
        Self {
            name: entry.name,
            size: entry.size,
            modified: entry
                .modified
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }
}

/// Response of `GET /api/files`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    /// Task that served the request.
    pub task_id: String,
    /// Visible files.
    pub files: Vec<FileEntryResponse>,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Stored file name.
    pub filename: String,
    /// Task that served the request.
    pub task_id: String,
}

/// Response of `DELETE /api/delete`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
    /// Task that served the request.
    pub task_id: String,
}

/// Response of `GET /api/stats`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Task that served the request.
    pub task_id: String,
    /// Number of visible files.
    pub files: usize,
    /// Total size in bytes.
    pub total_size: u64,
}

impl StatsResponse {
    /// Build from directory stats.
    pub fn new(task_id: String, stats: DirectoryStats) -> Self {
        Self {
            task_id,
            files: stats.file_count,
            total_size: stats.total_size,
        }
    }
}

/// Response of `POST /api/crash`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrashResponse {
    /// Always `true`.
    pub success: bool,
    /// Task that is about to exit.
    pub task_id: String,
    /// Seconds until exit.
    pub exit_in_secs: u64,
}
