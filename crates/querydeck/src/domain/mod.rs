//! Domain types for saved queries.
//!
//! A saved query is an opaque constraint string paired with the field used
//! as the search key. The constraint format belongs to whatever backend
//! eventually runs the query; nothing here parses it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Search key meaning "no explicit key selected".
///
/// It is never shown as checked in a field list.
pub const DEFAULT_SEARCH_KEY: &str = "objectId";

/// Returns `true` if `key` is the "unset" sentinel.
#[must_use]
pub fn is_default_search_key(key: &str) -> bool {
    key == DEFAULT_SEARCH_KEY
}

/// Store-assigned identifier of a saved query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryId(pub String);

impl QueryId {
    /// Create a new query ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for QueryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for QueryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A persisted `(constraint, search key)` pair offered for quick reuse.
///
/// Records are created on save and removed on delete. They are never
/// modified in place: editing a saved query copies it into the draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    /// Unique, stable identifier assigned by the store
    pub id: QueryId,

    /// Opaque filter expression
    pub constraint: String,

    /// Field used as the search key; absent or empty in stored data means the sentinel
    #[serde(default = "default_search_key", deserialize_with = "deserialize_search_key")]
    pub search_key: String,

    /// When the record was saved
    pub created_at: DateTime<Utc>,
}

impl SavedQuery {
    /// The pair this record emits when it is selected.
    #[must_use]
    pub fn selection(&self) -> QuerySelection {
        QuerySelection {
            constraint: self.constraint.clone(),
            search_key: self.search_key.clone(),
        }
    }
}

fn default_search_key() -> String {
    DEFAULT_SEARCH_KEY.to_string()
}

fn deserialize_search_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let key: Option<String> = Option::deserialize(deserializer)?;
    Ok(key
        .filter(|k| !k.is_empty())
        .unwrap_or_else(default_search_key))
}

/// Data for saving a new query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSavedQuery {
    /// Opaque filter expression
    pub constraint: String,

    /// Field used as the search key
    pub search_key: String,
}

impl NewSavedQuery {
    /// Create from a constraint and search key.
    pub fn new(constraint: impl Into<String>, search_key: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
            search_key: search_key.into(),
        }
    }
}

/// The final pair handed to the consumer when a session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySelection {
    /// Opaque filter expression
    pub constraint: String,

    /// Field used as the search key
    pub search_key: String,
}

impl QuerySelection {
    /// Create a selection from its parts.
    pub fn new(constraint: impl Into<String>, search_key: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
            search_key: search_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::missing(r#"{"id":"q-1","constraint":"a","created_at":"2024-01-01T00:00:00Z"}"#)]
    #[case::null(r#"{"id":"q-1","constraint":"a","search_key":null,"created_at":"2024-01-01T00:00:00Z"}"#)]
    #[case::empty(r#"{"id":"q-1","constraint":"a","search_key":"","created_at":"2024-01-01T00:00:00Z"}"#)]
    fn absent_search_key_reads_as_sentinel(#[case] json: &str) {
        let saved: SavedQuery = serde_json::from_str(json).unwrap();
        assert_eq!(saved.search_key, DEFAULT_SEARCH_KEY);
    }

    #[test]
    fn explicit_search_key_is_kept() {
        let json = r#"{"id":"q-1","constraint":"a","search_key":"score","created_at":"2024-01-01T00:00:00Z"}"#;
        let saved: SavedQuery = serde_json::from_str(json).unwrap();
        assert_eq!(saved.search_key, "score");
        assert_eq!(saved.selection(), QuerySelection::new("a", "score"));
    }

    #[test]
    fn sentinel_detection() {
        assert!(is_default_search_key("objectId"));
        assert!(!is_default_search_key("objectid"));
        assert!(!is_default_search_key(""));
    }
}
