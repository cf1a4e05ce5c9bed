//! Single-choice search key selection over a schema's field list.
//!
//! At most one field is checked at a time. Toggling the checked field
//! clears the selection back to [`DEFAULT_SEARCH_KEY`], which is never
//! reported as checked. Fields outside the list cannot be toggled on.

use crate::domain::{DEFAULT_SEARCH_KEY, is_default_search_key};

/// Tracks which field of a class is the active search key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKeySelector {
    fields: Vec<String>,
    current: String,
}

impl SearchKeySelector {
    /// Create a selector over `fields` with `initial` as the current key.
    ///
    /// `initial` is kept verbatim even if it is not one of the fields.
    pub fn new(fields: Vec<String>, initial: impl Into<String>) -> Self {
        Self {
            fields,
            current: initial.into(),
        }
    }

    /// The field list, in schema order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The current search key (the sentinel when nothing is selected).
    #[must_use]
    pub fn selected(&self) -> &str {
        &self.current
    }

    /// Toggle `field` and return the resulting search key.
    ///
    /// - `field` is the current key: selection clears to the sentinel.
    /// - `field` is another listed field: it becomes the key.
    /// - `field` is not listed: nothing changes.
    pub fn toggle(&mut self, field: &str) -> &str {
        if field == self.current {
            tracing::debug!(field, "Search key cleared");
            self.current = DEFAULT_SEARCH_KEY.to_string();
        } else if self.fields.iter().any(|f| f == field) {
            tracing::debug!(from = %self.current, to = field, "Search key changed");
            self.current = field.to_string();
        } else {
            tracing::debug!(field, "Ignoring toggle of unknown field");
        }
        &self.current
    }

    /// Clear the selection to the sentinel.
    pub fn clear(&mut self) {
        self.current = DEFAULT_SEARCH_KEY.to_string();
    }

    /// Replace the current key verbatim, e.g. when loading a saved query.
    pub fn set(&mut self, key: impl Into<String>) {
        self.current = key.into();
    }

    /// Whether `field` is shown as checked.
    #[must_use]
    pub fn is_checked(&self, field: &str) -> bool {
        !is_default_search_key(field) && field == self.current
    }

    /// Index of the checked field in [`fields`](Self::fields), if any.
    #[must_use]
    pub fn checked_index(&self) -> Option<usize> {
        self.fields.iter().position(|f| self.is_checked(f))
    }

    /// Fields paired with their checked state, for rendering.
    pub fn rows(&self) -> impl Iterator<Item = (&str, bool)> {
        self.fields
            .iter()
            .map(|f| (f.as_str(), self.is_checked(f)))
    }
}
