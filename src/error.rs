//! Error types for the file service.

use thiserror::Error;

/// Common error type for the file service.
#[derive(Error, Debug)]
pub enum FilesError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for client input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Target name is already taken.
    #[error("{0} already exists")]
    Conflict(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for file service operations.
pub type Result<T> = std::result::Result<T, FilesError>;
