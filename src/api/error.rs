//! API Error Types

use thiserror::Error;

/// Errors that can take the HTTP server down
#[derive(Error, Debug)]
pub enum ApiError {
    /// Binding or accepting on the listen socket failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server loop error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
