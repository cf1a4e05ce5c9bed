//! Async JSON Lines persistence for querydeck.
//!
//! Saved queries are stored one JSON object per line. This crate provides
//! the line-oriented reader and writer, a resilient loader that skips
//! malformed lines while collecting [`Warning`]s, and crash-safe atomic
//! file replacement.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{read_jsonl, read_jsonl_resilient, JsonlReader};
pub use warning::{Warning, WarningCollector};
pub use writer::JsonlWriter;
