//! Draft query state for an editing session.
//!
//! The draft is replaced wholesale by typing, by the structured builder or
//! by loading a saved query. Its contents are never validated here; the
//! consumer that eventually runs the query owns its syntax.

use crate::domain::SavedQuery;

/// Result of offering a replacement string to the single-line input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The text may be inserted; follow up with
    /// [`QueryEditorState::set_draft_query`] using the widget's full text.
    Accepted,
    /// A bare newline: not inserted, the input commits and loses focus.
    Commit,
}

/// The current `(draft query, search key)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryEditorState {
    draft_query: String,
    search_key: String,
}

impl QueryEditorState {
    /// Start editing from an initial pair.
    pub fn new(query: impl Into<String>, search_key: impl Into<String>) -> Self {
        Self {
            draft_query: query.into(),
            search_key: search_key.into(),
        }
    }

    /// The draft query text.
    #[must_use]
    pub fn draft_query(&self) -> &str {
        &self.draft_query
    }

    /// The draft's search key.
    #[must_use]
    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    /// Replace the draft verbatim.
    pub fn set_draft_query(&mut self, text: impl Into<String>) {
        self.draft_query = text.into();
    }

    /// Replace the draft with a structured builder's output. The search key
    /// is left alone.
    pub fn apply_builder_result(&mut self, text: impl Into<String>) {
        self.draft_query = text.into();
        tracing::debug!(draft = %self.draft_query, "Applied builder result");
    }

    /// Copy a saved query into the draft. The saved record is not touched.
    pub fn load_for_edit(&mut self, saved: &SavedQuery) {
        self.draft_query.clone_from(&saved.constraint);
        self.search_key.clone_from(&saved.search_key);
        tracing::debug!(id = %saved.id, "Loaded saved query for edit");
    }

    /// Replace the search key.
    pub fn set_search_key(&mut self, key: impl Into<String>) {
        self.search_key = key.into();
    }

    /// Input policy of the single-line editor: a bare `"\n"` commits
    /// instead of being inserted.
    #[must_use]
    pub fn handle_text_input(replacement: &str) -> InputOutcome {
        if replacement == "\n" {
            InputOutcome::Commit
        } else {
            InputOutcome::Accepted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryId;
    use chrono::Utc;
    use rstest::rstest;

    fn saved(constraint: &str, key: &str) -> SavedQuery {
        SavedQuery {
            id: QueryId::new("q-abc123"),
            constraint: constraint.to_string(),
            search_key: key.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn builder_result_keeps_search_key() {
        let mut editor = QueryEditorState::new("old", "username");
        editor.apply_builder_result(r#"{"score":{"$gt":10}}"#);

        assert_eq!(editor.draft_query(), r#"{"score":{"$gt":10}}"#);
        assert_eq!(editor.search_key(), "username");
    }

    #[rstest]
    #[case::from_empty("", "objectId")]
    #[case::from_other_draft("name=bob", "name")]
    fn load_for_edit_overwrites_both(#[case] query: &str, #[case] key: &str) {
        let mut editor = QueryEditorState::new(query, key);
        editor.load_for_edit(&saved("score>10", "score"));

        assert_eq!(editor.draft_query(), "score>10");
        assert_eq!(editor.search_key(), "score");
    }

    #[test]
    fn draft_is_never_rejected() {
        let mut editor = QueryEditorState::new("", "objectId");
        editor.set_draft_query("}}{{ not a query $$");
        assert_eq!(editor.draft_query(), "}}{{ not a query $$");
    }

    #[rstest]
    #[case::newline("\n", InputOutcome::Commit)]
    #[case::text("a", InputOutcome::Accepted)]
    #[case::empty_deletion("", InputOutcome::Accepted)]
    #[case::pasted_multiline("a\nb", InputOutcome::Accepted)]
    fn text_input_policy(#[case] replacement: &str, #[case] expected: InputOutcome) {
        assert_eq!(QueryEditorState::handle_text_input(replacement), expected);
    }
}
