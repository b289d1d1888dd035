//! File management on the shared volume.
//!
//! This module provides:
//! - Filename sanitization and timestamped stored names
//! - Listing, upload and delete against the uploads directory

mod naming;
mod storage;

use chrono::{DateTime, Utc};

pub use naming::{base_name, sanitize_delete_name, sanitize_upload_name, stamped_name};
pub use storage::{FileStore, PendingUpload, StoredFile};

/// A file in the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name, without directory components.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Aggregate numbers for the uploads directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Number of visible files.
    pub file_count: usize,
    /// Sum of their sizes in bytes.
    pub total_size: u64,
}
