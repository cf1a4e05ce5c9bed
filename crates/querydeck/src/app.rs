//! Application context for CLI command execution.
//!
//! # Example
//!
//! ```no_run
//! use querydeck::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     println!("{} saved queries", app.store().len());
//!     Ok(())
//! }
//! ```

use crate::commands::init::find_querydeck_root;
use crate::config::{CONFIG_FILE_NAME, QUERYDECK_DIR_NAME, QuerydeckConfig};
use crate::error::{ConfigError, Result};
use crate::storage::open_backend;
use crate::store::QueryStore;
use std::path::{Path, PathBuf};

/// Loaded repository: configuration plus the opened saved-query store.
#[derive(Debug)]
pub struct App {
    store: QueryStore,
    querydeck_dir: PathBuf,
    config: QuerydeckConfig,
}

impl App {
    /// Find the repository above `working_dir`, load its configuration and
    /// open the store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if no `.querydeck/` is found, or
    /// an error if the configuration or storage cannot be loaded.
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_querydeck_root(working_dir).ok_or(ConfigError::NotInitialized)?;
        let querydeck_dir = root_dir.join(QUERYDECK_DIR_NAME);

        let config = QuerydeckConfig::load(&querydeck_dir.join(CONFIG_FILE_NAME)).await?;
        let backend = config.storage_backend(&root_dir)?;
        tracing::debug!(?backend, prefix = %config.id_prefix, "Opening saved-query store");
        let store = QueryStore::open(open_backend(backend, &config.id_prefix).await?).await?;

        Ok(Self {
            store,
            querydeck_dir,
            config,
        })
    }

    /// The saved-query store.
    #[must_use]
    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    /// Mutable access to the saved-query store.
    pub fn store_mut(&mut self) -> &mut QueryStore {
        &mut self.store
    }

    /// Give up the store, e.g. to hand it to a session controller.
    #[must_use]
    pub fn into_store(self) -> QueryStore {
        self.store
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &QuerydeckConfig {
        &self.config
    }

    /// Path to the `.querydeck` directory.
    #[must_use]
    pub fn querydeck_dir(&self) -> &Path {
        &self.querydeck_dir
    }
}
