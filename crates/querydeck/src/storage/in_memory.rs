//! In-memory storage backend.
//!
//! All data is held in RAM and lost when the process exits. Two copies of
//! the record list are kept: the *working* list that `insert`/`delete`
//! mutate and `fetch_all` returns, and the *committed* snapshot that
//! `rollback` restores.
//!
//! # Thread Safety
//!
//! State lives behind `Arc<Mutex<..>>`, so clones of an [`InMemoryBackend`]
//! are handles onto the same data. The JSONL backend relies on this to
//! share its record table.

use crate::domain::{NewSavedQuery, QueryId, SavedQuery};
use crate::error::{StorageError, StorageResult};
use crate::id_generation::QueryIdGenerator;
use crate::storage::QueryBackend;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Inner storage structure (not thread-safe).
#[derive(Debug)]
struct InMemoryInner {
    /// Records including staged changes, in insertion order
    working: Vec<SavedQuery>,

    /// Records as of the last commit
    committed: Vec<SavedQuery>,

    /// ID generator; knows every ID in `working`
    id_generator: QueryIdGenerator,
}

impl InMemoryInner {
    fn new(prefix: &str) -> Self {
        Self {
            working: Vec::new(),
            committed: Vec::new(),
            id_generator: QueryIdGenerator::new(prefix),
        }
    }

    /// Replace all state with `records`, treating them as committed.
    fn reset(&mut self, records: Vec<SavedQuery>) {
        let mut generator = QueryIdGenerator::new(self.id_generator.prefix());
        for record in &records {
            generator.register_id(&record.id);
        }
        self.id_generator = generator;
        self.committed.clone_from(&records);
        self.working = records;
    }
}

/// Ephemeral backend; see the module docs.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    inner: Arc<Mutex<InMemoryInner>>,
}

impl InMemoryBackend {
    /// Create an empty backend generating IDs with `prefix`.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryInner::new(prefix))),
        }
    }

    /// Create a backend already holding `records` as committed data.
    ///
    /// Used when loading from disk.
    #[must_use]
    pub fn with_records(prefix: &str, records: Vec<SavedQuery>) -> Self {
        let mut inner = InMemoryInner::new(prefix);
        inner.reset(records);
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Records as of the last commit.
    pub async fn committed(&self) -> Vec<SavedQuery> {
        self.inner.lock().await.committed.clone()
    }
}

#[async_trait]
impl QueryBackend for InMemoryBackend {
    async fn fetch_all(&self) -> StorageResult<Vec<SavedQuery>> {
        Ok(self.inner.lock().await.working.clone())
    }

    async fn insert(&mut self, query: NewSavedQuery) -> StorageResult<SavedQuery> {
        let mut inner = self.inner.lock().await;

        let id = inner
            .id_generator
            .generate(&query.constraint, &query.search_key)
            .map_err(|e| StorageError::IdGeneration(e.to_string()))?;

        let saved = SavedQuery {
            id,
            constraint: query.constraint,
            search_key: query.search_key,
            created_at: Utc::now(),
        };
        inner.working.push(saved.clone());
        Ok(saved)
    }

    async fn delete(&mut self, id: &QueryId) -> StorageResult<()> {
        let mut inner = self.inner.lock().await;

        let index = inner
            .working
            .iter()
            .position(|q| &q.id == id)
            .ok_or_else(|| StorageError::NotFound(id.clone()))?;
        inner.working.remove(index);
        inner.id_generator.release_id(id);
        Ok(())
    }

    async fn commit(&mut self) -> StorageResult<()> {
        let mut inner = self.inner.lock().await;
        inner.committed = inner.working.clone();
        Ok(())
    }

    async fn rollback(&mut self) -> StorageResult<()> {
        let mut inner = self.inner.lock().await;
        let committed = inner.committed.clone();
        inner.reset(committed);
        Ok(())
    }
}
