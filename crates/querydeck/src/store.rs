//! The saved-query collection shown to the user.
//!
//! [`QueryStore`] keeps an ordered in-memory list mirroring what the
//! backend has committed. `add` and `delete` stage the change, commit it,
//! and only then touch the list; on any failure the backend is rolled back
//! and the list is left exactly as it was. Failures are not retried.
//!
//! If the rollback itself fails, the backend may still hold the staged
//! change. The store remembers this and rolls back again before the next
//! mutation, so a later commit never persists a record the list never showed.

use crate::domain::{NewSavedQuery, QueryId, SavedQuery};
use crate::error::{Result, StorageError};
use crate::storage::QueryBackend;

/// Ordered collection of saved queries over an injected backend.
pub struct QueryStore {
    backend: Box<dyn QueryBackend>,
    queries: Vec<SavedQuery>,
    /// A rollback failed; the backend's working set may not match `queries`
    rollback_pending: bool,
}

impl std::fmt::Debug for QueryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStore")
            .field("queries", &self.queries)
            .field("rollback_pending", &self.rollback_pending)
            .field("backend", &"<dyn QueryBackend>")
            .finish()
    }
}

impl QueryStore {
    /// Load the current records from `backend`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the backend cannot be read.
    pub async fn open(backend: Box<dyn QueryBackend>) -> Result<Self> {
        let queries = backend.fetch_all().await?;
        tracing::debug!(count = queries.len(), "Loaded saved queries");
        Ok(Self {
            backend,
            queries,
            rollback_pending: false,
        })
    }

    /// Saved queries in insertion order.
    #[must_use]
    pub fn list(&self) -> &[SavedQuery] {
        &self.queries
    }

    /// Number of saved queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Returns `true` if nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Look up a saved query by ID.
    #[must_use]
    pub fn get(&self, id: &QueryId) -> Option<&SavedQuery> {
        self.queries.iter().find(|q| &q.id == id)
    }

    /// Position of a saved query in the list.
    #[must_use]
    pub fn position(&self, id: &QueryId) -> Option<usize> {
        self.queries.iter().position(|q| &q.id == id)
    }

    /// Persist a new saved query and append it to the list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the insert or commit fails. The list is
    /// unchanged in that case.
    pub async fn add(
        &mut self,
        constraint: impl Into<String>,
        search_key: impl Into<String>,
    ) -> Result<SavedQuery> {
        let new_query = NewSavedQuery::new(constraint, search_key);
        self.resync().await?;

        let staged = match self.backend.insert(new_query).await {
            Ok(saved) => saved,
            Err(e) => return Err(self.abort("insert", e).await.into()),
        };
        if let Err(e) = self.backend.commit().await {
            return Err(self.abort("insert", e).await.into());
        }

        tracing::info!(id = %staged.id, "Query added");
        self.queries.push(staged.clone());
        Ok(staged)
    }

    /// Remove a saved query from the backend and the list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the record is unknown or the delete or
    /// commit fails. The list is unchanged in that case.
    pub async fn delete(&mut self, query: &SavedQuery) -> Result<()> {
        let Some(index) = self.position(&query.id) else {
            return Err(StorageError::NotFound(query.id.clone()).into());
        };
        self.resync().await?;

        if let Err(e) = self.backend.delete(&query.id).await {
            return Err(self.abort("delete", e).await.into());
        }
        if let Err(e) = self.backend.commit().await {
            return Err(self.abort("delete", e).await.into());
        }

        tracing::info!(id = %query.id, "Query deleted");
        self.queries.remove(index);
        Ok(())
    }

    /// Retry a rollback that failed earlier, before staging anything new.
    async fn resync(&mut self) -> Result<()> {
        if !self.rollback_pending {
            return Ok(());
        }
        self.backend.rollback().await?;
        self.rollback_pending = false;
        tracing::debug!("Recovered from earlier rollback failure");
        Ok(())
    }

    /// Roll the backend back after a failed step and hand back the error.
    async fn abort(&mut self, operation: &str, error: StorageError) -> StorageError {
        tracing::warn!(operation, error = %error, "Saved-query storage failed");
        if let Err(rollback_error) = self.backend.rollback().await {
            tracing::warn!(
                operation,
                error = %rollback_error,
                "Rollback after storage failure also failed"
            );
            self.rollback_pending = true;
        }
        error
    }
}
