//! Error types for querydeck.
//!
//! [`StorageError`] is the only failure the saved-query core itself can
//! produce; it is reported to the user as a transient message and the
//! failed operation leaves state unchanged. [`ConfigError`] covers the
//! repository and configuration layer used by the CLI.

use crate::domain::QueryId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Persistence failure while reading, inserting, deleting or committing.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing file is not valid JSONL.
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// No saved query with this ID exists in the backend.
    #[error("Saved query not found in storage: {0}")]
    NotFound(QueryId),

    /// A unique ID could not be generated.
    #[error("ID generation failed: {0}")]
    IdGeneration(String),

    /// Backend-specific failure.
    #[error("{0}")]
    Backend(String),
}

impl From<querydeck_jsonl::Error> for StorageError {
    fn from(err: querydeck_jsonl::Error) -> Self {
        match err {
            querydeck_jsonl::Error::Io(e) => Self::Io(e),
            querydeck_jsonl::Error::Json(e) => Self::Serialization(e),
            e @ querydeck_jsonl::Error::InvalidFormat { .. } => Self::InvalidFormat(e.to_string()),
        }
    }
}

/// Repository and configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.querydeck/` directory was found.
    #[error("Not a querydeck repository (or any parent). Run 'querydeck init' first.")]
    NotInitialized,

    /// `init` ran where a repository already exists.
    #[error("querydeck is already initialized: found existing '{}'", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The ID prefix is malformed.
    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),

    /// The storage backend named in the config is not known.
    #[error("Unsupported storage backend '{0}' (expected 'memory' or 'jsonl')")]
    UnsupportedBackend(String),

    /// The config file could not be parsed or written.
    #[error("Configuration error: {0}")]
    Parse(String),
}

/// The error type for querydeck operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing error outside the store (e.g. a schema file).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The session was asked about a saved query it does not list.
    #[error("Saved query not found: {0}")]
    QueryNotFound(QueryId),

    /// The schema provider has no class with this name.
    #[error("Unknown class: {0}")]
    UnknownClass(String),
}

impl Error {
    /// Returns `true` for failures that should be shown as a transient
    /// "could not save/delete" message rather than aborting the session.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// A specialized Result type for querydeck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type returned by persistence backends.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
