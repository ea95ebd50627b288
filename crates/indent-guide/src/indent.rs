//! Leading whitespace measurement.

/// Number of leading whitespace characters on `line`.
///
/// Tabs count as a single character, the same as spaces.
pub fn indent_width(line: &str) -> usize {
    leading_whitespace(line.chars())
}

/// Returns `true` if `line` is empty or contains only whitespace.
pub fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// Indent width of a non-blank line, `None` for blank or whitespace-only lines.
///
/// Blank lines carry no meaningful indentation and are skipped by block scanning.
pub fn measure(line: &str) -> Option<usize> {
    measure_chars(line.chars())
}

pub(crate) fn measure_chars(chars: impl Iterator<Item = char>) -> Option<usize> {
    let mut width = 0;
    for ch in chars {
        if !ch.is_whitespace() {
            return Some(width);
        }
        width += 1;
    }
    None
}

fn leading_whitespace(chars: impl Iterator<Item = char>) -> usize {
    chars.take_while(|ch| ch.is_whitespace()).count()
}
