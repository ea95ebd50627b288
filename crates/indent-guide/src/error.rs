//! Error types for the indent guide engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Structural errors: a caller asked about a line the buffer does not have.
pub enum GuideError {
    #[error("line {line} is out of range (buffer has {line_count} lines)")]
    /// [`LineBuffer::line_at`](crate::LineBuffer::line_at) was given a line outside `1..=line_count`.
    OutOfRange {
        /// Requested 1-based line number.
        line: usize,
        /// Number of lines in the buffer.
        line_count: usize,
    },

    #[error("cursor line {line} is not a valid line (buffer has {line_count} lines)")]
    /// [`BlockLocator::locate`](crate::BlockLocator::locate) was given a cursor line outside the buffer.
    InvalidLine {
        /// Requested 1-based cursor line.
        line: usize,
        /// Number of lines in the buffer.
        line_count: usize,
    },
}

#[derive(Debug, Error)]
/// Errors produced while resolving the guide color from a syntax theme.
pub enum ThemeError {
    #[error("unknown theme '{0}'")]
    /// The requested theme (or one of its parents) is not registered.
    UnknownTheme(String),

    #[error("inheritance cycle detected involving '{0}'")]
    /// A `parent` chain formed a cycle.
    InheritanceCycle(String),

    #[error("theme '{theme}' has no foreground color for '{key}'")]
    /// The resolved theme does not define the color the guide reads.
    MissingColor {
        /// Theme name.
        theme: String,
        /// Settings key that was looked up.
        key: String,
    },

    #[error("invalid color value '{0}'")]
    /// A color string could not be parsed.
    InvalidColor(String),

    #[error("theme parse error: {0}")]
    /// A theme document was not valid JSON or did not match the theme schema.
    Parse(#[from] serde_json::Error),
}
