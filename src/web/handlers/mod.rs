//! API handlers.

pub mod files;
pub mod info;
pub mod page;

pub use files::*;
pub use info::*;
pub use page::*;

use std::time::Duration;

use crate::config::Config;
use crate::file::FileStore;
use crate::identity::TaskIdentity;

/// Application state shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Uploads directory on the shared volume.
    pub store: FileStore,
    /// Task identity source.
    pub identity: TaskIdentity,
    /// Mount path reported by `/api/info`.
    pub mount_path: String,
    /// Upload body cap in bytes.
    pub max_upload_size: usize,
    /// Delay of the crash endpoint; `None` when it is disabled.
    pub crash_delay: Option<Duration>,
}

impl AppState {
    /// Create a new application state with the default upload cap.
    pub fn new(store: FileStore, identity: TaskIdentity, mount_path: impl Into<String>) -> Self {
        Self {
            store,
            identity,
            mount_path: mount_path.into(),
            max_upload_size: crate::config::StorageConfig::default().max_upload_bytes(),
            crash_delay: None,
        }
    }

    /// Build the state described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let store = FileStore::new(
            &config.storage.uploads_dir,
            config.storage.hidden_prefix.clone(),
        );
        let crash_delay = config
            .web
            .crash_endpoint
            .then(|| Duration::from_secs(config.web.crash_delay_secs));

        Self::new(
            store,
            TaskIdentity::new(config.identity.task_id.clone()),
            config.storage.mount_path.clone(),
        )
        .with_max_upload_size(config.storage.max_upload_bytes())
        .with_crash_delay(crash_delay)
    }

    /// Set the upload body cap in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Enable or disable the crash endpoint.
    pub fn with_crash_delay(mut self, delay: Option<Duration>) -> Self {
        self.crash_delay = delay;
        self
    }
}
