//! Directory-backed file store.
//!
//! The uploads directory on the shared volume is the only source of truth:
//! nothing is cached between calls, so every task sees what every other task
//! wrote.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::naming::{sanitize_delete_name, sanitize_upload_name, stamped_name};
use super::{DirectoryStats, FileEntry};
use crate::{FilesError, Result};

/// File store rooted at the uploads directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    uploads_dir: PathBuf,
    hidden_prefix: String,
}

impl FileStore {
    /// Create a store for `uploads_dir`. No filesystem access happens here.
    pub fn new(uploads_dir: impl Into<PathBuf>, hidden_prefix: impl Into<String>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
            hidden_prefix: hidden_prefix.into(),
        }
    }

    /// Get the uploads directory.
    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Create the uploads directory if it doesn't exist.
    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.uploads_dir).await?;
        Ok(())
    }

    /// Whether the uploads directory exists and is a directory.
    ///
    /// Any stat error counts as "not mounted".
    pub async fn is_mounted(&self) -> bool {
        fs::metadata(&self.uploads_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    fn is_hidden(&self, name: &str) -> bool {
        !self.hidden_prefix.is_empty() && name.starts_with(&self.hidden_prefix)
    }

    /// List visible regular files, sorted by name.
    ///
    /// A missing uploads directory yields an empty list.
    pub async fn list(&self) -> Result<Vec<FileEntry>> {
        let mut dir = match fs::read_dir(&self.uploads_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.is_hidden(&name) {
                continue;
            }

            // Follows symlinks. The entry may be removed by another task
            // between readdir and stat, and dangling links fail here too.
            let metadata = match fs::metadata(entry.path()).await {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", name, e);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| DateTime::<Utc>::from(std::time::UNIX_EPOCH));

            entries.push(FileEntry {
                name,
                size: metadata.len(),
                modified,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Count visible files and sum their sizes.
    pub async fn stats(&self) -> Result<DirectoryStats> {
        let entries = self.list().await?;
        Ok(DirectoryStats {
            file_count: entries.len(),
            total_size: entries.iter().map(|e| e.size).sum(),
        })
    }

    /// Open a new file for an upload named `client_name`.
    ///
    /// The stored name carries the `now` timestamp as a suffix. The file is
    /// created with create-new semantics: if the name is already taken the
    /// upload fails with [`FilesError::Conflict`] instead of overwriting.
    pub async fn begin_upload(&self, client_name: &str, now: DateTime<Utc>) -> Result<PendingUpload> {
        let sanitized = sanitize_upload_name(client_name, &self.hidden_prefix)?;
        let name = stamped_name(&sanitized, now.timestamp());
        let path = self.uploads_dir.join(&name);

        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => FilesError::Conflict(name.clone()),
                _ => FilesError::Io(e),
            })?;

        Ok(PendingUpload {
            file,
            path,
            name,
            written: 0,
        })
    }

    /// Store `content` in one go under a stamped name derived from `client_name`.
    pub async fn save(
        &self,
        client_name: &str,
        content: &[u8],
        now: DateTime<Utc>,
    ) -> Result<StoredFile> {
        let mut pending = self.begin_upload(client_name, now).await?;
        if let Err(e) = pending.write(content).await {
            pending.abort().await;
            return Err(e);
        }
        pending.finish().await
    }

    /// Read a visible file by name and return its sanitized name and content.
    ///
    /// Hidden names and non-regular files are reported as not found.
    pub async fn read(&self, raw_name: &str) -> Result<(String, Vec<u8>)> {
        let name = sanitize_delete_name(raw_name)?;
        if self.is_hidden(&name) {
            return Err(FilesError::NotFound(name));
        }
        let path = self.uploads_dir.join(&name);

        match fs::metadata(&path).await {
            Ok(m) if m.is_file() => {}
            Ok(_) => return Err(FilesError::NotFound(name)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FilesError::NotFound(name));
            }
            Err(e) => return Err(e.into()),
        }

        match fs::read(&path).await {
            Ok(content) => Ok((name, content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FilesError::NotFound(name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a file by name and return the sanitized name that was removed.
    pub async fn delete(&self, raw_name: &str) -> Result<String> {
        let name = sanitize_delete_name(raw_name)?;
        let path = self.uploads_dir.join(&name);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(name),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FilesError::NotFound(name)),
            Err(e) => Err(e.into()),
        }
    }
}

/// An upload being written to disk.
///
/// Call [`PendingUpload::finish`] once the body is complete, or
/// [`PendingUpload::abort`] to remove the partial file.
#[derive(Debug)]
pub struct PendingUpload {
    file: fs::File,
    path: PathBuf,
    name: String,
    written: u64,
}

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Final stored name.
    pub name: String,
    /// Bytes written.
    pub size: u64,
}

impl PendingUpload {
    /// Stored name of this upload.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a chunk of the body.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush and close the file.
    pub async fn finish(mut self) -> Result<StoredFile> {
        if let Err(e) = self.file.flush().await {
            self.abort().await;
            return Err(e.into());
        }

        Ok(StoredFile {
            name: self.name,
            size: self.written,
        })
    }

    /// Close and remove the partial file.
    pub async fn abort(self) {
        let PendingUpload { file, path, .. } = self;
        drop(file);

        if let Err(e) = fs::remove_file(&path).await {
            tracing::warn!("Failed to remove partial upload {}: {}", path.display(), e);
        }
    }
}
