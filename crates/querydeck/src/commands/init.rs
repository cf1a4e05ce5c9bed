//! Implementation of the `init` command.
//!
//! Creates the `.querydeck/` directory with a configuration file and an
//! empty saved-query file.

use crate::config::{
    CONFIG_FILE_NAME, DEFAULT_PREFIX, QUERIES_FILE_NAME, QUERYDECK_DIR_NAME, QuerydeckConfig,
};
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Minimum prefix length
pub const MIN_PREFIX_LENGTH: usize = 1;

/// Maximum prefix length
pub const MAX_PREFIX_LENGTH: usize = 20;

/// Maximum directory depth to traverse when searching for the repository root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created `.querydeck` directory
    pub querydeck_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created saved-query file
    pub queries_file: PathBuf,
    /// The prefix used for query IDs
    pub prefix: String,
}

/// Validate a query ID prefix: 1-20 ASCII alphanumeric characters.
///
/// Expects pre-trimmed input.
///
/// # Errors
///
/// Returns `ConfigError::InvalidPrefix` describing the first violated rule.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.len() < MIN_PREFIX_LENGTH {
        return Err(ConfigError::InvalidPrefix(format!(
            "Prefix must be at least {MIN_PREFIX_LENGTH} character"
        ))
        .into());
    }

    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(ConfigError::InvalidPrefix(format!(
            "Prefix cannot exceed {MAX_PREFIX_LENGTH} characters"
        ))
        .into());
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidPrefix(
            "Prefix must contain only alphanumeric characters".to_string(),
        )
        .into());
    }

    Ok(())
}

/// Initialize a querydeck repository in `base_dir`.
///
/// # Errors
///
/// Returns an error if `.querydeck/` already exists, the prefix is invalid,
/// or a file system operation fails.
pub async fn init(base_dir: &Path, prefix: Option<&str>) -> Result<InitResult> {
    let prefix = prefix.unwrap_or(DEFAULT_PREFIX).trim();
    validate_prefix(prefix)?;

    let querydeck_dir = base_dir.join(QUERYDECK_DIR_NAME);
    if querydeck_dir.exists() {
        return Err(ConfigError::AlreadyInitialized(querydeck_dir).into());
    }

    fs::create_dir_all(&querydeck_dir).await?;

    let config_file = querydeck_dir.join(CONFIG_FILE_NAME);
    QuerydeckConfig::new(prefix).save(&config_file).await?;

    let queries_file = querydeck_dir.join(QUERIES_FILE_NAME);
    fs::write(&queries_file, "").await?;

    tracing::info!(dir = %querydeck_dir.display(), prefix, "Initialized querydeck repository");

    Ok(InitResult {
        querydeck_dir,
        config_file,
        queries_file,
        prefix: prefix.to_string(),
    })
}

/// Find the directory containing `.querydeck/`, walking up from `start_dir`.
///
/// Returns `None` if no repository is found within [`MAX_TRAVERSAL_DEPTH`]
/// levels.
#[must_use]
pub fn find_querydeck_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(QUERYDECK_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
