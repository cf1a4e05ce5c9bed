//! Non-fatal problems found while loading a JSONL file.
//!
//! A saved-query file that was hand-edited or truncated by a crash should
//! still load. Lines that cannot be decoded are skipped and described by a
//! [`Warning`]; a [`WarningCollector`] gathers them during a read.
//!
//! ```
//! use querydeck_jsonl::warning::{Warning, WarningCollector};
//!
//! let collector = WarningCollector::new();
//! collector.add(Warning::MalformedJson {
//!     line_number: 3,
//!     error: "expected value".to_string(),
//! });
//!
//! let warnings = collector.into_warnings();
//! assert_eq!(warnings[0].line_number(), 3);
//! ```

use std::sync::{Arc, Mutex, PoisonError};

/// A non-fatal warning that occurred during JSONL processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A line contained malformed JSON that could not be parsed.
    MalformedJson {
        /// The 1-based line number where the error occurred.
        line_number: usize,
        /// A description of the JSON parsing error.
        error: String,
    },

    /// A line was skipped for a reason other than malformed JSON.
    SkippedLine {
        /// The 1-based line number that was skipped.
        line_number: usize,
        /// The reason the line was skipped.
        reason: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedJson { line_number, .. } | Self::SkippedLine { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// ```
    /// use querydeck_jsonl::warning::Warning;
    ///
    /// let warning = Warning::SkippedLine {
    ///     line_number: 7,
    ///     reason: "line is not valid UTF-8".to_string(),
    /// };
    /// assert_eq!(warning.description(), "line 7: skipped: line is not valid UTF-8");
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedJson { line_number, error } => {
                format!("line {line_number}: malformed JSON: {error}")
            }
            Self::SkippedLine {
                line_number,
                reason,
            } => format!("line {line_number}: skipped: {reason}"),
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SkippedLine { .. } => "skipped_line",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

impl std::error::Error for Warning {}

/// A cloneable collector for warnings raised during a read.
///
/// Clones share the same underlying list, so a collector can be handed to a
/// stream and inspected by the caller afterwards. A poisoned lock is
/// recovered rather than propagated since the list is append-only.
#[derive(Debug, Clone, Default)]
pub struct WarningCollector {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl WarningCollector {
    /// Creates a new empty `WarningCollector`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning to the collector.
    pub fn add(&self, warning: Warning) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }

    /// Returns the number of warnings collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no warnings have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the collector and returns the warnings in insertion order.
    ///
    /// If other clones are still alive their view is left intact and a copy
    /// is returned.
    #[must_use]
    pub fn into_warnings(self) -> Vec<Warning> {
        match Arc::try_unwrap(self.warnings) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}
