//! Hash-based ID generation for saved queries.
//!
//! IDs look like `{prefix}-{hash}` (e.g. `q-3k9x2a`), where the hash is a
//! base36 rendering of a SHA-256 digest over the record contents, the
//! current time and a nonce. Collisions with already-registered IDs are
//! retried with the next nonce.
//!
//! ```
//! use querydeck::id_generation::QueryIdGenerator;
//!
//! let mut generator = QueryIdGenerator::new("q");
//! let id = generator.generate("score>10", "username").unwrap();
//! assert!(id.as_str().starts_with("q-"));
//! ```

use crate::domain::QueryId;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

const BASE36_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MAX_NONCE: u32 = 100;

/// Length of the hash part of a generated ID.
pub const HASH_LENGTH: usize = 6;

/// Length used once every nonce at [`HASH_LENGTH`] has collided.
const FALLBACK_HASH_LENGTH: usize = 8;

/// Errors that can occur during ID generation
#[derive(Debug, Error)]
pub enum IdGenerationError {
    /// Unable to generate a unique ID after exhausting all nonces and the fallback length
    #[error("Unable to generate unique ID after {attempts} attempts")]
    CollisionExhausted {
        /// Number of nonces tried.
        attempts: u32,
    },
}

/// Generates unique saved-query IDs and remembers the ones in use.
#[derive(Debug, Clone)]
pub struct QueryIdGenerator {
    prefix: String,
    existing_ids: HashSet<String>,
}

impl QueryIdGenerator {
    /// Create a generator for IDs with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            existing_ids: HashSet::new(),
        }
    }

    /// The configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Register an existing ID so it is never handed out again.
    pub fn register_id(&mut self, id: &QueryId) {
        self.existing_ids.insert(id.as_str().to_string());
    }

    /// Forget a deleted ID.
    pub fn release_id(&mut self, id: &QueryId) {
        self.existing_ids.remove(id.as_str());
    }

    /// Generate a new unique ID for a record with these contents.
    ///
    /// # Errors
    ///
    /// Returns [`IdGenerationError::CollisionExhausted`] if no free ID could be
    /// found at either length.
    pub fn generate(
        &mut self,
        constraint: &str,
        search_key: &str,
    ) -> Result<QueryId, IdGenerationError> {
        for length in [HASH_LENGTH, FALLBACK_HASH_LENGTH] {
            for nonce in 0..MAX_NONCE {
                let id = self.hash_id(constraint, search_key, nonce, length);
                if self.existing_ids.insert(id.clone()) {
                    if nonce > 0 {
                        debug!(nonce, length, "Generated unique ID after collision retries");
                    }
                    return Ok(QueryId::new(id));
                }
            }
            warn!(length, max_nonce = MAX_NONCE, "All nonces exhausted at this ID length");
        }

        Err(IdGenerationError::CollisionExhausted {
            attempts: MAX_NONCE * 2,
        })
    }

    fn hash_id(&self, constraint: &str, search_key: &str, nonce: u32, length: usize) -> String {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let content = format!("{constraint}|{search_key}|{timestamp}|{nonce}");

        let digest = Sha256::digest(content.as_bytes());
        let hash = encode_base36(&digest[..8], length);

        format!("{}-{}", self.prefix, hash)
    }
}

/// Encode up to eight bytes as a fixed-width base36 string.
fn encode_base36(bytes: &[u8], length: usize) -> String {
    let mut n = bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_shl(8).wrapping_add(u64::from(b)));

    let mut out = vec![b'0'; length];
    for slot in out.iter_mut().rev() {
        // Remainder is always < 36.
        #[allow(clippy::cast_possible_truncation)]
        let idx = (n % 36) as usize;
        *slot = BASE36_CHARS[idx];
        n /= 36;
    }
    out.into_iter().map(char::from).collect()
}

/// Check that `id` has the `{prefix}-{base36}` shape produced by the generator.
#[must_use]
pub fn validate_id(id: &str, prefix: &str) -> bool {
    let Some(hash) = id
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
    else {
        return false;
    };

    (HASH_LENGTH..=FALLBACK_HASH_LENGTH).contains(&hash.len())
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn base36_is_fixed_width() {
        assert_eq!(encode_base36(&[0], 6), "000000");
        assert_eq!(encode_base36(&[35], 4), "000z");
        assert_eq!(encode_base36(&[0xff; 8], 8).len(), 8);
    }

    #[test]
    fn generated_ids_are_unique_and_valid() {
        let mut generator = QueryIdGenerator::new("q");
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let id = generator.generate("same", "same").unwrap();
            assert!(validate_id(id.as_str(), "q"), "bad id {id}");
            assert!(seen.insert(id));
        }
    }

    #[test]
    fn released_ids_can_be_registered_again() {
        let mut generator = QueryIdGenerator::new("q");
        let id = generator.generate("a", "b").unwrap();
        generator.release_id(&id);
        generator.register_id(&id);
        assert!(generator.existing_ids.contains(id.as_str()));
    }

    #[rstest]
    #[case::valid("q-a1b2c3", true)]
    #[case::valid_fallback("q-a1b2c3d4", true)]
    #[case::wrong_prefix("x-a1b2c3", false)]
    #[case::too_short("q-a1b", false)]
    #[case::uppercase("q-A1B2C3", false)]
    #[case::no_dash("qa1b2c3", false)]
    fn id_validation(#[case] id: &str, #[case] expected: bool) {
        assert_eq!(validate_id(id, "q"), expected);
    }
}
