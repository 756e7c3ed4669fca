//! Common error types for RELAB tooling

use thiserror::Error;

/// Common result type for RELAB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across RELAB crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source file could not be parsed into a sheet
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// File being parsed
        path: String,
        /// What went wrong
        message: String,
    },

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input value
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
