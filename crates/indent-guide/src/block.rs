//! Block location
//!
//! Finds the vertical extent of the indented block around a cursor line using indentation
//! alone, without parsing the language.
//!
//! Starting from the cursor line, the locator scans upward and downward. Blank and
//! whitespace-only lines are skipped. Lines indented at least as deep as the cursor line belong
//! to the block; the first strictly shallower line stops the scan. Scanning upward, that
//! shallower line is the block's *opener* (the statement that introduces the block).

use crate::error::GuideError;
use crate::line_buffer::LineBuffer;
use serde::{Deserialize, Serialize};

/// Which lines the downward scan may visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanBoundary {
    /// Scan all the way to the last line of the buffer.
    #[default]
    IncludeLastLine,
    /// Never visit the buffer's last line while scanning downward.
    ///
    /// A block that ends on the last line reports an end one line short, unless the cursor
    /// itself is on the last line.
    ExcludeLastLine,
}

/// Vertical extent of an indented block (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// First line of the block.
    pub start: usize,
    /// Last line of the block.
    pub end: usize,
    /// Indent width of the cursor line the block was located from.
    pub indent: usize,
    /// Nearest strictly shallower non-blank line above the block, if any.
    pub opener: Option<usize>,
}

impl BlockRange {
    /// Number of lines spanned by the block.
    pub fn line_span(&self) -> usize {
        self.end - self.start + 1
    }

    /// Returns `true` if `line` lies inside the block.
    pub fn contains(&self, line: usize) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

struct ScanEnd {
    last_matching: usize,
    stopped_at: Option<usize>,
}

/// Locates indented blocks in a [`LineBuffer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLocator {
    boundary: ScanBoundary,
}

impl BlockLocator {
    /// Create a locator with the given downward scan boundary.
    pub fn new(boundary: ScanBoundary) -> Self {
        Self { boundary }
    }

    /// The downward scan boundary in use.
    pub fn boundary(&self) -> ScanBoundary {
        self.boundary
    }

    /// Locate the block containing the 1-based `cursor_line`.
    ///
    /// Returns `Ok(None)` when the cursor line is not indented (top-level code has no guide)
    /// or is blank. Fails with [`GuideError::InvalidLine`] when `cursor_line` is outside the
    /// buffer.
    pub fn locate(
        &self,
        buffer: &LineBuffer,
        cursor_line: usize,
    ) -> Result<Option<BlockRange>, GuideError> {
        let line_count = buffer.line_count();
        if cursor_line == 0 || cursor_line > line_count {
            return Err(GuideError::InvalidLine {
                line: cursor_line,
                line_count,
            });
        }

        let line_indent = match buffer.indent_at(cursor_line)? {
            Some(0) | None => return Ok(None),
            Some(width) => width,
        };

        let up = self.scan(buffer, cursor_line, line_indent, Direction::Up)?;
        let down = self.scan(buffer, cursor_line, line_indent, Direction::Down)?;

        Ok(Some(BlockRange {
            start: up.last_matching,
            end: down.last_matching,
            indent: line_indent,
            opener: up.stopped_at,
        }))
    }

    fn scan(
        &self,
        buffer: &LineBuffer,
        from: usize,
        line_indent: usize,
        direction: Direction,
    ) -> Result<ScanEnd, GuideError> {
        let last_line = match self.boundary {
            ScanBoundary::IncludeLastLine => buffer.line_count(),
            ScanBoundary::ExcludeLastLine => buffer.line_count().saturating_sub(1),
        };

        let mut last_matching = from;
        let mut scan_line = from;
        loop {
            let next = match direction {
                Direction::Up => scan_line.checked_sub(1).filter(|&line| line >= 1),
                Direction::Down => Some(scan_line + 1).filter(|&line| line <= last_line),
            };
            let Some(next) = next else {
                return Ok(ScanEnd {
                    last_matching,
                    stopped_at: None,
                });
            };
            scan_line = next;

            let Some(indent) = buffer.indent_at(scan_line)? else {
                continue;
            };
            if indent < line_indent {
                return Ok(ScanEnd {
                    last_matching,
                    stopped_at: Some(scan_line),
                });
            }
            last_matching = scan_line;
        }
    }
}
