//! Saved-query session controller.
//!
//! A session starts in the editing state and ends in exactly one of two
//! ways: a selection is emitted to the consumer (`apply` or
//! `select_saved`), or the session is cancelled and nothing is emitted.
//! The terminal operations take `self`, so a finished controller cannot be
//! touched again and the consumer fires at most once.
//!
//! ```no_run
//! use querydeck::controller::SavedQueryController;
//! use querydeck::storage::InMemoryBackend;
//! use querydeck::store::QueryStore;
//!
//! # async fn demo() -> querydeck::Result<()> {
//! let store = QueryStore::open(Box::new(InMemoryBackend::new("q"))).await?;
//! let mut session = SavedQueryController::new(
//!     store,
//!     vec!["username".into(), "score".into()],
//!     "",
//!     "objectId",
//!     Box::new(|selection| println!("{} by {}", selection.constraint, selection.search_key)),
//! );
//! session.set_draft_query("score>10");
//! session.toggle_search_key("username");
//! session.apply();
//! # Ok(())
//! # }
//! ```

use crate::bridge::{QueryBuilder, QueryBuilderBridge};
use crate::domain::{QueryId, QuerySelection, SavedQuery};
use crate::editor::{InputOutcome, QueryEditorState};
use crate::error::{Error, Result};
use crate::selector::SearchKeySelector;
use crate::store::QueryStore;

/// Receives the single selection a session produces.
pub type SelectionConsumer = Box<dyn FnOnce(QuerySelection) + Send>;

/// Drives one saved-query session.
pub struct SavedQueryController {
    store: QueryStore,
    editor: QueryEditorState,
    selector: SearchKeySelector,
    class_name: String,
    consumer: SelectionConsumer,
}

impl std::fmt::Debug for SavedQueryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedQueryController")
            .field("class_name", &self.class_name)
            .field("editor", &self.editor)
            .field("selector", &self.selector)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl SavedQueryController {
    /// Start a session over `store` with the class's `fields`.
    pub fn new(
        store: QueryStore,
        fields: Vec<String>,
        initial_query: impl Into<String>,
        initial_key: impl Into<String>,
        consumer: SelectionConsumer,
    ) -> Self {
        let initial_key = initial_key.into();
        let editor = QueryEditorState::new(initial_query, initial_key.clone());
        let selector = SearchKeySelector::new(fields, initial_key);
        tracing::debug!(
            draft = editor.draft_query(),
            key = editor.search_key(),
            saved = store.len(),
            "Session started"
        );
        Self {
            store,
            editor,
            selector,
            class_name: String::new(),
            consumer,
        }
    }

    /// Name the class being queried, passed on to the structured builder.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// The current draft query.
    #[must_use]
    pub fn draft(&self) -> &str {
        self.editor.draft_query()
    }

    /// The current search key.
    #[must_use]
    pub fn search_key(&self) -> &str {
        self.editor.search_key()
    }

    /// Saved queries in display order.
    #[must_use]
    pub fn saved(&self) -> &[SavedQuery] {
        self.store.list()
    }

    /// The class's fields, in display order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        self.selector.fields()
    }

    /// The search key selector, for rendering checked state.
    #[must_use]
    pub fn selector(&self) -> &SearchKeySelector {
        &self.selector
    }

    /// The class name given with [`with_class_name`](Self::with_class_name).
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Replace the draft with the editor's full text.
    pub fn set_draft_query(&mut self, text: impl Into<String>) {
        self.editor.set_draft_query(text);
        tracing::debug!(draft = self.editor.draft_query(), "Draft updated");
    }

    /// Feed a text-widget replacement through the single-line input policy.
    ///
    /// An accepted replacement becomes the new draft. A bare newline is a
    /// commit and leaves the draft untouched.
    pub fn handle_text_input(&mut self, replacement: &str) -> InputOutcome {
        let outcome = QueryEditorState::handle_text_input(replacement);
        match outcome {
            InputOutcome::Accepted => self.set_draft_query(replacement),
            InputOutcome::Commit => tracing::debug!("Draft input committed"),
        }
        outcome
    }

    /// Toggle `field` as the search key and return the resulting key.
    pub fn toggle_search_key(&mut self, field: &str) -> &str {
        let key = self.selector.toggle(field).to_string();
        self.editor.set_search_key(key);
        self.editor.search_key()
    }

    /// Replace the draft with a builder result. The search key is kept.
    pub fn apply_builder_result(&mut self, text: impl Into<String>) {
        QueryBuilderBridge::deliver(&mut self.editor, text);
    }

    /// Run a structured builder over this session's class and fields.
    ///
    /// Returns `true` if the builder produced a result.
    pub fn run_builder(&mut self, builder: &dyn QueryBuilder) -> bool {
        let request = QueryBuilderBridge::request(&self.class_name, self.selector.fields());
        QueryBuilderBridge::run(builder, &request, &mut self.editor)
    }

    /// Persist the current `(draft, key)` pair as a new saved query.
    ///
    /// The draft itself is not validated; an empty draft is saved as-is.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if persistence fails. Nothing changes then.
    pub async fn save(&mut self) -> Result<SavedQuery> {
        let result = self
            .store
            .add(self.editor.draft_query(), self.editor.search_key())
            .await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Could not save query");
        }
        result
    }

    /// Load a saved query into the draft and selector for editing.
    ///
    /// The saved record itself is not modified.
    ///
    /// # Errors
    ///
    /// Returns `Error::QueryNotFound` if `id` is not listed.
    pub fn edit_saved(&mut self, id: &QueryId) -> Result<()> {
        let saved = self
            .store
            .get(id)
            .ok_or_else(|| Error::QueryNotFound(id.clone()))?;
        self.editor.load_for_edit(saved);
        self.selector.set(saved.search_key.clone());
        Ok(())
    }

    /// Delete a saved query. The draft is not affected.
    ///
    /// # Errors
    ///
    /// Returns `Error::QueryNotFound` if `id` is not listed and
    /// `Error::Storage` if persistence fails.
    pub async fn delete_saved(&mut self, id: &QueryId) -> Result<()> {
        let saved = self
            .store
            .get(id)
            .cloned()
            .ok_or_else(|| Error::QueryNotFound(id.clone()))?;
        let result = self.store.delete(&saved).await;
        if let Err(e) = &result {
            tracing::warn!(%id, error = %e, "Could not delete query");
        }
        result
    }

    /// End the session by emitting the current `(draft, key)` pair.
    pub fn apply(self) -> QuerySelection {
        let selection = QuerySelection::new(self.editor.draft_query(), self.editor.search_key());
        self.emit(selection)
    }

    /// End the session by emitting a saved query's pair, ignoring the draft.
    ///
    /// # Errors
    ///
    /// If `id` is not listed the controller is handed back together with
    /// `Error::QueryNotFound` and the session continues.
    #[allow(clippy::result_large_err)]
    pub fn select_saved(self, id: &QueryId) -> std::result::Result<QuerySelection, (Self, Error)> {
        match self.store.get(id).map(SavedQuery::selection) {
            Some(selection) => Ok(self.emit(selection)),
            None => {
                tracing::debug!(%id, "Selected query is not listed");
                Err((self, Error::QueryNotFound(id.clone())))
            }
        }
    }

    /// End the session without emitting anything.
    pub fn cancel(self) {
        tracing::info!("Session cancelled");
    }

    fn emit(self, selection: QuerySelection) -> QuerySelection {
        tracing::info!(
            constraint = %selection.constraint,
            key = %selection.search_key,
            "Emitting query selection"
        );
        (self.consumer)(selection.clone());
        selection
    }
}
