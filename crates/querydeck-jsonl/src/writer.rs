//! JSONL writing operations.
//!
//! This module provides async functionality for writing data in JSONL format
//! with efficient buffering.

use crate::error::Result;
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for JSONL (JSON Lines) data.
///
/// Each value is serialized compactly to a single line followed by `\n`.
/// Output is buffered; call [`flush`](Self::flush) before dropping the
/// writer or the tail of the data may be lost.
///
/// # Examples
///
/// ```no_run
/// use querydeck_jsonl::writer::JsonlWriter;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("queries.jsonl").await?;
/// let mut writer = JsonlWriter::new(file);
/// writer.write(&serde_json::json!({"constraint": "score>10"})).await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlWriter<W> {
    /// Buffered writer wrapping the underlying async writer.
    writer: BufWriter<W>,
    /// Number of records written so far.
    records: usize,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            records: 0,
        }
    }

    /// Creates a new `JsonlWriter` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, writer),
            records: 0,
        }
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Serializes `value` as one line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub async fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.records += 1;
        Ok(())
    }

    /// Writes every value from an iterator, one line each.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first serialization or write failure.
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered output to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// This does not flush.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}
