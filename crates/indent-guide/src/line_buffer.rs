//! Line buffer
//!
//! Holds the active document as a sequence of lines addressed from 1. The buffer is replaced
//! wholesale on every content change; there is no incremental diffing.

use crate::error::GuideError;
use crate::indent;
use ropey::Rope;
use std::borrow::Cow;

/// Snapshot of the active document, addressed by 1-based line numbers.
///
/// Backed by a [`Rope`], so line lookup is O(log N) and a refresh costs one linear pass over
/// the new text.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    rope: Rope,
}

impl LineBuffer {
    /// Create an empty buffer (a single empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Replace the buffer contents with `text`, split on `\n` (a preceding `\r` is dropped).
    ///
    /// `N` line breaks produce `N + 1` lines, so a trailing newline yields a trailing empty line.
    pub fn refresh(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Drop all content, leaving a single empty line.
    pub fn clear(&mut self) {
        self.rope = Rope::new();
    }

    /// Total line count (never zero).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of the 1-based `line`, without its line break.
    pub fn line_at(&self, line: usize) -> Result<Cow<'_, str>, GuideError> {
        let index = self.index_of(line)?;
        Ok(strip_line_break(Cow::from(self.rope.line(index))))
    }

    /// Indent width of the 1-based `line`, or `None` when the line is blank.
    pub fn indent_at(&self, line: usize) -> Result<Option<usize>, GuideError> {
        let index = self.index_of(line)?;
        Ok(indent::measure_chars(self.rope.line(index).chars()))
    }

    /// Get complete text
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    fn index_of(&self, line: usize) -> Result<usize, GuideError> {
        let line_count = self.line_count();
        if line == 0 || line > line_count {
            return Err(GuideError::OutOfRange { line, line_count });
        }
        Ok(line - 1)
    }
}

fn strip_line_break(line: Cow<'_, str>) -> Cow<'_, str> {
    match line {
        Cow::Borrowed(s) => Cow::Borrowed(&s[..content_len(s)]),
        Cow::Owned(mut s) => {
            s.truncate(content_len(&s));
            Cow::Owned(s)
        }
    }
}

fn content_len(line: &str) -> usize {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .map_or(line.len(), str::len)
}
