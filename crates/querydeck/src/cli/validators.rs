//! CLI input validation functions.
//!
//! Used by clap's `value_parser` attribute so bad input is rejected at parse
//! time with a specific message.

/// Validate a query ID prefix.
///
/// Delegates to [`crate::commands::init::validate_prefix`].
pub fn validate_prefix(s: &str) -> Result<String, String> {
    use crate::commands::init;

    let trimmed = s.trim();
    init::validate_prefix(trimmed).map_err(|e| e.to_string())?;
    Ok(trimmed.to_string())
}

/// Validate the shape of a saved-query ID: `prefix-hash`, both parts
/// alphanumeric.
///
/// Whether the ID exists is decided later against the store.
pub fn validate_query_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Query ID cannot be empty".to_string());
    }

    let Some((prefix, hash)) = s.split_once('-') else {
        return Err(format!(
            "Invalid query ID format: '{s}'. Expected format: prefix-hash (e.g., q-a1b2c3)"
        ));
    };

    validate_prefix(prefix).map_err(|e| format!("Query ID {}", e.to_lowercase()))?;

    if hash.is_empty() {
        return Err("Query ID hash cannot be empty".to_string());
    }

    if !hash.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Query ID hash must contain only alphanumeric characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate a search key field name.
pub fn validate_field_name(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Search key cannot be empty".to_string());
    }

    if s.chars().any(char::is_whitespace) {
        return Err(format!("Search key '{s}' cannot contain whitespace"));
    }

    Ok(s.to_string())
}
