//! JSONL-file backed storage.
//!
//! Records are kept in an [`InMemoryBackend`]; `commit` rewrites the whole
//! file atomically through [`querydeck_jsonl::write_jsonl_atomic`], and
//! `rollback` restores the in-memory snapshot of the last commit without
//! touching the file. Loading is resilient: undecodable lines
//! are skipped and logged rather than failing the open.

use super::in_memory::InMemoryBackend;
use crate::domain::{NewSavedQuery, QueryId, SavedQuery};
use crate::error::StorageResult;
use crate::storage::QueryBackend;
use async_trait::async_trait;
use querydeck_jsonl::{read_jsonl_resilient, write_jsonl_atomic};
use std::path::{Path, PathBuf};

/// Backend persisting saved queries to a JSON Lines file.
#[derive(Debug)]
pub struct JsonlBackend {
    records: InMemoryBackend,
    path: PathBuf,
}

impl JsonlBackend {
    /// Open the file at `path`, or start empty if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file exists but cannot be read.
    pub async fn open(path: impl Into<PathBuf>, prefix: &str) -> StorageResult<Self> {
        let path = path.into();
        let records = load_records(&path).await?;
        tracing::debug!(path = %path.display(), count = records.len(), "Opened saved-query file");
        Ok(Self {
            records: InMemoryBackend::with_records(prefix, records),
            path,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn load_records(path: &Path) -> StorageResult<Vec<SavedQuery>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let (records, warnings) = read_jsonl_resilient::<SavedQuery, _>(path).await?;
    for warning in &warnings {
        tracing::warn!(path = %path.display(), %warning, "Skipped saved-query record");
    }
    Ok(records)
}

#[async_trait]
impl QueryBackend for JsonlBackend {
    async fn fetch_all(&self) -> StorageResult<Vec<SavedQuery>> {
        self.records.fetch_all().await
    }

    async fn insert(&mut self, query: NewSavedQuery) -> StorageResult<SavedQuery> {
        self.records.insert(query).await
    }

    async fn delete(&mut self, id: &QueryId) -> StorageResult<()> {
        self.records.delete(id).await
    }

    async fn commit(&mut self) -> StorageResult<()> {
        let working = self.records.fetch_all().await?;
        write_jsonl_atomic(&self.path, working.as_slice()).await?;
        self.records.commit().await
    }

    async fn rollback(&mut self) -> StorageResult<()> {
        self.records.rollback().await
    }
}
