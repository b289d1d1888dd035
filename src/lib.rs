//! efs-files - shared-volume file service.
//!
//! Lists, uploads and deletes files in a directory on a volume shared by
//! several container tasks, reporting which task served each request.

pub mod config;
pub mod error;
pub mod file;
pub mod identity;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{FilesError, Result};
pub use file::{DirectoryStats, FileEntry, FileStore};
pub use identity::TaskIdentity;
pub use web::WebServer;
