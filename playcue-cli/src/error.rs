//! Error types for the playcue CLI

use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O errors (rule file not readable, etc.)
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Duration argument is neither a time token nor a seconds value
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Output serialization errors
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience Result type using the CLI Error
pub type Result<T> = std::result::Result<T, Error>;
