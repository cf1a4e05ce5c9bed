//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success: green   (saved, deleted, emitted selection)
//!   - Warning: yellow  (storage failures shown as transient messages)
//!   - Error:   red
//!   - Info:    cyan    (query IDs, operator symbols)
//!   - Accent:  magenta (search keys)
//!   - Muted:   dimmed  (field labels, unchecked rows)

use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Colorize a search key (magenta).
pub(crate) fn colorize_key(key: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return key.to_string();
    }
    key.magenta().to_string()
}

/// Checkbox for a field row, with ASCII fallback.
pub(crate) fn check_mark(checked: bool, config: &OutputConfig) -> String {
    let icon = match (checked, config.use_ascii) {
        (true, true) => "[x]",
        (false, true) => "[ ]",
        (true, false) => "✓",
        (false, false) => " ",
    };
    if checked && config.use_colors {
        icon.green().bold().to_string()
    } else {
        icon.to_string()
    }
}

/// Apply dimmed style to text.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}
