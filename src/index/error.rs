//! Index error types
//!
//! Defines all errors that can occur in the index layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building or persisting the index
#[derive(Error, Debug)]
pub enum IndexError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured index directory exists but is not a directory
    #[error("'{0}' exists and is not a directory")]
    NotADirectory(PathBuf),

    /// A background dump/load task failed to complete
    #[error("background task failed: {0}")]
    Task(String),
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;
