//! Output formatting for CLI commands.
//!
//! Every printer takes a writer so the same code serves stdout and the
//! session driver's output stream. Text mode is for people; JSON mode is
//! for scripts.

pub mod color;

use crate::domain::{QuerySelection, SavedQuery};
use crate::help::Operator;
use crate::selector::SearchKeySelector;
use serde::Serialize;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{bold, check_mark, colorize_key, dimmed};

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Settings that control text formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use ASCII-only check marks.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_ascii: bool, use_colors: bool) -> Self {
        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Read settings from the environment.
    ///
    /// - `QUERYDECK_MAX_WIDTH`: maximum content width
    /// - `QUERYDECK_ASCII`: `1` or `true` for ASCII check marks
    /// - `NO_COLOR`: any value disables colors
    #[must_use]
    pub fn from_env() -> Self {
        let max_width = match env::var("QUERYDECK_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "QUERYDECK_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_ascii = env::var("QUERYDECK_ASCII")
            .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        // https://no-color.org/
        let use_colors = env::var_os("NO_COLOR").is_none();

        Self {
            max_width,
            use_ascii,
            use_colors,
        }
    }

    /// Usable width: the terminal width capped at `max_width`.
    #[must_use]
    pub fn width(&self) -> usize {
        terminal_width().min(self.max_width)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_WIDTH, false, true)
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size().map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| {
        usize::from(w.0)
    })
}

/// Print any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

/// Print a single saved query.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_query<W: Write>(
    w: &mut W,
    query: &SavedQuery,
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => write_json(w, query),
        OutputMode::Text => writeln!(
            w,
            "{} {} {}",
            info(query.id.as_str(), config),
            display_constraint(&query.constraint),
            dimmed(&format!("(key: {})", colorize_key(&query.search_key, config)), config)
        ),
    }
}

/// Print the saved-query list.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_queries<W: Write>(
    w: &mut W,
    queries: &[SavedQuery],
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    if mode == OutputMode::Json {
        return write_json(w, queries);
    }
    if queries.is_empty() {
        return writeln!(w, "No saved queries.");
    }

    writeln!(w, "{}", bold(&format!("Saved queries ({}):", queries.len()), config))?;
    for query in queries {
        write!(w, "  ")?;
        write_query(w, query, mode, config)?;
    }
    Ok(())
}

/// Print the pair a session emitted.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_selection<W: Write>(
    w: &mut W,
    selection: &QuerySelection,
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => write_json(w, selection),
        OutputMode::Text => writeln!(
            w,
            "{} {} {}",
            success("selected", config),
            display_constraint(&selection.constraint),
            dimmed(&format!("(key: {})", colorize_key(&selection.search_key, config)), config)
        ),
    }
}

#[derive(Serialize)]
struct FieldRow<'a> {
    name: &'a str,
    checked: bool,
}

/// Print the field list with the current search key checked.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_fields<W: Write>(
    w: &mut W,
    selector: &SearchKeySelector,
    mode: OutputMode,
    config: &OutputConfig,
) -> io::Result<()> {
    if mode == OutputMode::Json {
        let rows: Vec<_> = selector
            .rows()
            .map(|(name, checked)| FieldRow { name, checked })
            .collect();
        return write_json(w, &rows);
    }

    for (name, checked) in selector.rows() {
        let label = if checked {
            colorize_key(name, config)
        } else {
            name.to_string()
        };
        writeln!(w, "{} {label}", check_mark(checked, config))?;
    }
    Ok(())
}

/// Print the operator reference, wrapping descriptions to the usable width.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_operators<W: Write>(
    w: &mut W,
    operators: &[Operator],
    config: &OutputConfig,
) -> io::Result<()> {
    let symbol_width = operators.iter().map(|o| o.symbol.len()).max().unwrap_or(0);
    let indent = symbol_width + 2;
    let text_width = config.width().saturating_sub(indent).max(20);

    for op in operators {
        let padded = format!("{:<symbol_width$}", op.symbol);
        for (i, line) in textwrap::wrap(op.description, text_width).iter().enumerate() {
            if i == 0 {
                writeln!(w, "{}  {line}", info(&padded, config))?;
            } else {
                writeln!(w, "{:indent$}{line}", "")?;
            }
        }
    }
    Ok(())
}

/// Print a one-line message.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn write_message<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    writeln!(w, "{message}")
}

fn display_constraint(constraint: &str) -> &str {
    if constraint.is_empty() {
        "(empty)"
    } else {
        constraint
    }
}
