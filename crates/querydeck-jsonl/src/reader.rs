//! JSONL reading operations.
//!
//! This module provides async functionality for reading JSONL files line-by-line
//! with efficient buffering and line number tracking for error reporting.
//!
//! Two reading modes are offered:
//!
//! - **Strict** ([`JsonlReader::read_line`], [`read_jsonl`]): the first
//!   malformed line aborts the read with [`Error::InvalidFormat`].
//! - **Resilient** ([`JsonlReader::read_line_resilient`], [`read_jsonl_resilient`]):
//!   malformed lines are skipped and reported as [`Warning`]s so a partially
//!   corrupted file still loads.
//!
//! Blank lines are ignored in both modes.

use crate::error::{Error, Result};
use crate::warning::{Warning, WarningCollector};
use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// A single raw line pulled from the underlying reader.
enum RawLine {
    /// Decoded text with the line terminator removed.
    Text(String),
    /// Bytes that were not valid UTF-8.
    InvalidUtf8,
}

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader and provides buffered reading of JSONL
/// formatted data. It tracks line numbers to provide useful context in error
/// messages when parsing fails.
///
/// # Examples
///
/// ```no_run
/// use querydeck_jsonl::reader::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("queries.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(value) = reader.read_line::<serde_json::Value>().await? {
///     println!("{value}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based counting, 0 before any lines are read) for error reporting.
    line_number: usize,
    /// Scratch buffer reused across reads.
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    ///
    /// Line numbering uses 1-based indexing: the counter starts at 0 and increments
    /// after each line is read, so the first line read is numbered 1.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Returns the current line number.
    ///
    /// Returns 0 before any lines have been read. After reading, returns the
    /// 1-based line number of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-blank raw line, or `None` at end of input.
    async fn next_raw_line(&mut self) -> Result<Option<RawLine>> {
        loop {
            self.buf.clear();
            let read = self.reader.read_until(b'\n', &mut self.buf).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
                self.buf.pop();
            }

            match std::str::from_utf8(&self.buf) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => return Ok(Some(RawLine::Text(text.to_string()))),
                Err(_) => return Ok(Some(RawLine::InvalidUtf8)),
            }
        }
    }

    /// Reads and deserializes the next record.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on read failure and [`Error::InvalidFormat`] if
    /// the line is not valid UTF-8 or not valid JSON for `T`.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        match self.next_raw_line().await? {
            None => Ok(None),
            Some(RawLine::InvalidUtf8) => Err(Error::InvalidFormat {
                line_number: self.line_number,
                message: "line is not valid UTF-8".to_string(),
            }),
            Some(RawLine::Text(text)) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| Error::InvalidFormat {
                    line_number: self.line_number,
                    message: e.to_string(),
                }),
        }
    }

    /// Reads the next record, skipping lines that fail to decode.
    ///
    /// Each skipped line is recorded in `warnings`. Only I/O failures abort.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying reader fails.
    pub async fn read_line_resilient<T: DeserializeOwned>(
        &mut self,
        warnings: &WarningCollector,
    ) -> Result<Option<T>> {
        loop {
            match self.next_raw_line().await? {
                None => return Ok(None),
                Some(RawLine::InvalidUtf8) => {
                    tracing::debug!(line = self.line_number, "Skipping non UTF-8 line");
                    warnings.add(Warning::SkippedLine {
                        line_number: self.line_number,
                        reason: "line is not valid UTF-8".to_string(),
                    });
                }
                Some(RawLine::Text(text)) => match serde_json::from_str(&text) {
                    Ok(value) => return Ok(Some(value)),
                    Err(e) => {
                        tracing::debug!(line = self.line_number, error = %e, "Skipping malformed line");
                        warnings.add(Warning::MalformedJson {
                            line_number: self.line_number,
                            error: e.to_string(),
                        });
                    }
                },
            }
        }
    }

    /// Converts the reader into a stream of records that skips bad lines.
    ///
    /// Warnings are pushed into `warnings` as the stream is polled.
    pub fn into_stream_resilient<T: DeserializeOwned>(
        self,
        warnings: WarningCollector,
    ) -> impl Stream<Item = Result<T>> {
        stream::unfold(
            (self, warnings, false),
            |(mut reader, warnings, done)| async move {
                if done {
                    return None;
                }
                match reader.read_line_resilient::<T>(&warnings).await {
                    Ok(Some(value)) => Some((Ok(value), (reader, warnings, false))),
                    Ok(None) => None,
                    Err(e) => Some((Err(e), (reader, warnings, true))),
                }
            },
        )
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

/// Reads every record from a JSONL file, failing on the first bad line.
///
/// # Errors
///
/// See [`JsonlReader::read_line`].
pub async fn read_jsonl<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    let mut reader = JsonlReader::new(file);
    let mut values = Vec::new();
    while let Some(value) = reader.read_line().await? {
        values.push(value);
    }
    Ok(values)
}

/// Reads every decodable record from a JSONL file.
///
/// Returns the records in file order together with a warning for each line
/// that was skipped.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    let mut reader = JsonlReader::new(file);
    let warnings = WarningCollector::new();
    let mut values = Vec::new();
    while let Some(value) = reader.read_line_resilient(&warnings).await? {
        values.push(value);
    }
    Ok((values, warnings.into_warnings()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn new_reader_starts_at_line_zero() {
        let reader = JsonlReader::new(Cursor::new(b""));
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn read_line_skips_blank_lines() {
        let data = Cursor::new(b"{\"id\":1}\n\n   \n{\"id\":2}\r\n".to_vec());
        let mut reader = JsonlReader::new(data);

        assert_eq!(reader.read_line::<Row>().await.unwrap(), Some(Row { id: 1 }));
        assert_eq!(reader.read_line::<Row>().await.unwrap(), Some(Row { id: 2 }));
        assert_eq!(reader.line_number(), 4);
        assert_eq!(reader.read_line::<Row>().await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_line_reports_line_of_bad_record() {
        let data = Cursor::new(b"{\"id\":1}\nnot json\n".to_vec());
        let mut reader = JsonlReader::new(data);

        reader.read_line::<Row>().await.unwrap();
        let err = reader.read_line::<Row>().await.unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { line_number: 2, .. }));
    }

    #[tokio::test]
    async fn resilient_read_collects_warnings() {
        let data = Cursor::new(b"{\"id\":1}\n{bad\n\xff\xfe\n{\"id\":3}\n".to_vec());
        let mut reader = JsonlReader::new(data);
        let warnings = WarningCollector::new();

        let mut rows = Vec::new();
        while let Some(row) = reader.read_line_resilient::<Row>(&warnings).await.unwrap() {
            rows.push(row);
        }

        assert_eq!(rows, vec![Row { id: 1 }, Row { id: 3 }]);
        let warnings = warnings.into_warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].kind(), "malformed_json");
        assert_eq!(warnings[0].line_number(), 2);
        assert_eq!(warnings[1].kind(), "skipped_line");
        assert_eq!(warnings[1].line_number(), 3);
    }
}
