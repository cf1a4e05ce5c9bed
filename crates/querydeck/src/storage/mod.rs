//! Persistence backends for saved queries.
//!
//! A backend works like a unit of work: [`insert`](QueryBackend::insert) and
//! [`delete`](QueryBackend::delete) stage changes, [`commit`](QueryBackend::commit)
//! makes them durable and [`rollback`](QueryBackend::rollback) discards them.
//! The [`QueryStore`](crate::store::QueryStore) drives this protocol so that
//! its in-memory list only changes once a commit has succeeded.
//!
//! Two implementations are provided:
//!
//! - **In-memory**: ephemeral, commit always succeeds
//! - **JSONL**: the committed set is rewritten atomically to a JSON Lines file
//!
//! # Test Utilities
//!
//! With the `test-util` feature (or in this crate's own tests) a
//! [`FailingBackend`] is available whose operations can be made to fail on
//! demand, for exercising the store's failure policy.
//!
//! # Example
//!
//! ```no_run
//! use querydeck::domain::NewSavedQuery;
//! use querydeck::storage::{open_backend, StorageBackend};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut backend = open_backend(StorageBackend::InMemory, "q").await?;
//!     let saved = backend.insert(NewSavedQuery::new("score>10", "username")).await?;
//!     backend.commit().await?;
//!     println!("saved {}", saved.id);
//!     Ok(())
//! }
//! ```

use crate::domain::{NewSavedQuery, QueryId, SavedQuery};
use crate::error::StorageResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod in_memory;
pub mod jsonl;

pub use in_memory::InMemoryBackend;
pub use jsonl::JsonlBackend;

/// Persistence backend for saved queries.
///
/// Object-safe so it can be injected as `Box<dyn QueryBackend>`.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// All records, staged changes included, in insertion order.
    async fn fetch_all(&self) -> StorageResult<Vec<SavedQuery>>;

    /// Stage a new record and assign its identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::IdGeneration` if no unique ID is available.
    async fn insert(&mut self, query: NewSavedQuery) -> StorageResult<SavedQuery>;

    /// Stage removal of a record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no record has this ID.
    async fn delete(&mut self, id: &QueryId) -> StorageResult<()>;

    /// Make staged changes durable.
    async fn commit(&mut self) -> StorageResult<()>;

    /// Discard staged changes, returning to the last committed state.
    async fn rollback(&mut self) -> StorageResult<()>;
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    #[must_use]
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Open a backend. IDs it generates start with `prefix`.
///
/// A JSONL file that does not exist yet is treated as empty; it is created
/// by the first commit.
///
/// # Errors
///
/// Returns `StorageError::Io` if an existing JSONL file cannot be read.
pub async fn open_backend(
    backend: StorageBackend,
    prefix: &str,
) -> StorageResult<Box<dyn QueryBackend>> {
    match backend {
        StorageBackend::InMemory => Ok(Box::new(InMemoryBackend::new(prefix))),
        StorageBackend::Jsonl(path) => Ok(Box::new(JsonlBackend::open(path, prefix).await?)),
    }
}

// ========== Test Utilities ==========

#[cfg(any(test, feature = "test-util"))]
pub use failing::{BackendOp, FailingBackend};

#[cfg(any(test, feature = "test-util"))]
mod failing {
    use super::{InMemoryBackend, QueryBackend};
    use crate::domain::{NewSavedQuery, QueryId, SavedQuery};
    use crate::error::{StorageError, StorageResult};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex, PoisonError};

    /// Backend operation that a [`FailingBackend`] can be told to fail.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum BackendOp {
        /// `fetch_all`
        FetchAll,
        /// `insert`
        Insert,
        /// `delete`
        Delete,
        /// `commit`
        Commit,
        /// `rollback`
        Rollback,
    }

    /// In-memory backend whose operations fail on demand.
    ///
    /// Clones share both the data and the failure switches, so a test can keep
    /// a handle after moving the backend into a store.
    #[derive(Debug, Clone)]
    pub struct FailingBackend {
        inner: InMemoryBackend,
        failing: Arc<Mutex<HashSet<BackendOp>>>,
    }

    impl FailingBackend {
        /// Create an empty backend with no failures armed.
        #[must_use]
        pub fn new() -> Self {
            Self {
                inner: InMemoryBackend::new("test"),
                failing: Arc::default(),
            }
        }

        /// Make `op` fail until [`heal`](Self::heal) is called.
        pub fn fail(&self, op: BackendOp) {
            self.failing
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(op);
        }

        /// Let `op` succeed again.
        pub fn heal(&self, op: BackendOp) {
            self.failing
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&op);
        }

        /// Records as of the last successful commit.
        pub async fn committed(&self) -> Vec<SavedQuery> {
            self.inner.committed().await
        }

        fn check(&self, op: BackendOp) -> StorageResult<()> {
            if self
                .failing
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(&op)
            {
                return Err(StorageError::Backend(format!("injected {op:?} failure")));
            }
            Ok(())
        }
    }

    impl Default for FailingBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl QueryBackend for FailingBackend {
        async fn fetch_all(&self) -> StorageResult<Vec<SavedQuery>> {
            self.check(BackendOp::FetchAll)?;
            self.inner.fetch_all().await
        }

        async fn insert(&mut self, query: NewSavedQuery) -> StorageResult<SavedQuery> {
            self.check(BackendOp::Insert)?;
            self.inner.insert(query).await
        }

        async fn delete(&mut self, id: &QueryId) -> StorageResult<()> {
            self.check(BackendOp::Delete)?;
            self.inner.delete(id).await
        }

        async fn commit(&mut self) -> StorageResult<()> {
            self.check(BackendOp::Commit)?;
            self.inner.commit().await
        }

        async fn rollback(&mut self) -> StorageResult<()> {
            self.check(BackendOp::Rollback)?;
            self.inner.rollback().await
        }
    }
}
