//! Atomic replacement of JSONL files.
//!
//! The saved-query file is always rewritten as a whole. To make that
//! crash-safe the data is first written to a sibling `.tmp` file, flushed,
//! and then renamed over the target. Renames within one filesystem are atomic
//! on POSIX, so readers see either the old file or the new one, never a
//! truncated mix.
//!
//! ```no_run
//! use querydeck_jsonl::write_jsonl_atomic;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Saved {
//!     constraint: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rows = vec![Saved { constraint: "score>10".to_string() }];
//! write_jsonl_atomic("queries.jsonl", &rows).await?;
//! # Ok(())
//! # }
//! ```

use crate::{JsonlWriter, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically writes a slice of values to a JSONL file.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, a
/// value fails to serialize, or the final rename fails. On failure the
/// original file is left unchanged and the temporary file is removed on a
/// best-effort basis.
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_jsonl_atomic_iter(path, values.iter()).await
}

/// Atomically writes an iterator of values to a JSONL file.
///
/// # Errors
///
/// See [`write_jsonl_atomic`].
pub async fn write_jsonl_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, values).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }

    tracing::trace!(path = %path.display(), "Replaced JSONL file");
    Ok(())
}

/// `queries.jsonl` becomes `queries.jsonl.tmp`; `queries` becomes `queries.tmp`.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

async fn write_to_temp_file<T, I>(temp_path: &Path, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    writer.write_all(values).await?;
    writer.flush().await?;
    writer.into_inner().into_inner().sync_all().await?;
    Ok(())
}
