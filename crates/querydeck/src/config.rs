//! Repository configuration (`.querydeck/config.yaml`).

use crate::domain::DEFAULT_SEARCH_KEY;
use crate::error::{ConfigError, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Name of the querydeck directory
pub const QUERYDECK_DIR_NAME: &str = ".querydeck";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the saved-query data file
pub const QUERIES_FILE_NAME: &str = "queries.jsonl";

/// Default query ID prefix if none specified
pub const DEFAULT_PREFIX: &str = "q";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuerydeckConfig {
    /// Saved-query ID prefix (e.g. "q" for "q-a1b2c3")
    #[serde(rename = "id-prefix")]
    pub id_prefix: String,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Search key a new session starts with
    #[serde(rename = "default-search-key", default = "default_search_key")]
    pub default_search_key: String,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type: "jsonl" or "memory"
    pub backend: String,

    /// Path to the data file, relative to the repository root
    pub data_file: String,
}

fn default_search_key() -> String {
    DEFAULT_SEARCH_KEY.to_string()
}

impl QuerydeckConfig {
    /// Create a configuration with the given prefix and JSONL storage.
    pub fn new(prefix: &str) -> Self {
        Self {
            id_prefix: prefix.to_string(),
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: format!("{QUERYDECK_DIR_NAME}/{QUERIES_FILE_NAME}"),
            },
            default_search_key: default_search_key(),
        }
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read or `ConfigError::Parse`
    /// if it is not valid YAML for this structure.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Resolve the configured backend against the repository root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedBackend` for an unknown backend name.
    pub fn storage_backend(&self, root: &Path) -> Result<StorageBackend> {
        match self.storage.backend.as_str() {
            "jsonl" => Ok(StorageBackend::Jsonl(root.join(&self.storage.data_file))),
            "memory" => Ok(StorageBackend::InMemory),
            other => Err(ConfigError::UnsupportedBackend(other.to_string()).into()),
        }
    }
}

impl Default for QuerydeckConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let original = QuerydeckConfig::new("dash");
        original.save(&path).await.unwrap();

        assert_eq!(QuerydeckConfig::load(&path).await.unwrap(), original);
    }

    #[tokio::test]
    async fn yaml_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        QuerydeckConfig::new("dash").save(&path).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("id-prefix: dash"));
        assert!(content.contains("backend: jsonl"));
        assert!(content.contains("data_file: .querydeck/queries.jsonl"));
        assert!(content.contains("default-search-key: objectId"));
    }

    #[tokio::test]
    async fn missing_search_key_defaults_to_sentinel() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(
            &path,
            "id-prefix: q\nstorage:\n  backend: memory\n  data_file: x.jsonl\n",
        )
        .await
        .unwrap();

        let config = QuerydeckConfig::load(&path).await.unwrap();
        assert_eq!(config.default_search_key, DEFAULT_SEARCH_KEY);
    }

    #[tokio::test]
    async fn malformed_yaml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, "storage: [").await.unwrap();

        let err = QuerydeckConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[rstest]
    #[case::jsonl("jsonl", Some(StorageBackend::Jsonl(PathBuf::from("/repo/.querydeck/queries.jsonl"))))]
    #[case::memory("memory", Some(StorageBackend::InMemory))]
    #[case::unknown("postgres", None)]
    fn resolves_backend(#[case] name: &str, #[case] expected: Option<StorageBackend>) {
        let mut config = QuerydeckConfig::default();
        config.storage.backend = name.to_string();

        let resolved = config.storage_backend(Path::new("/repo")).ok();
        assert_eq!(resolved, expected);
    }
}
