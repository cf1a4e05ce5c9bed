//! Error types for querydeck-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for querydeck-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid JSONL format, with the 1-based line it was found on.
    #[error("Invalid JSONL format at line {line_number}: {message}")]
    InvalidFormat {
        /// Line that failed.
        line_number: usize,
        /// What was wrong with it.
        message: String,
    },
}

/// A specialized Result type for querydeck-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
