//! Minimal text editor state that hosts the indent guide.
//!
//! Terminal cells stand in for pixels: every character cell is one unit wide (two for wide
//! CJK characters) and every line is one unit tall.

use indent_guide::{
    Color, FontMetrics, GuideHost, HitTest, PixelBox, TextColumn, ThemeError, ThemeRegistry,
    ViewportRange,
};
use unicode_width::UnicodeWidthChar;

/// Spaces inserted for a tab key press and used to expand tabs on load.
pub const TAB_WIDTH: usize = 4;

/// Guide segment currently drawn over the text area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideOverlay {
    pub id: u64,
    pub x: f32,
    pub y_top: f32,
    pub height: f32,
    pub color: Color,
}

impl GuideOverlay {
    /// Text-area rows covered by the segment, as a half-open range.
    pub fn rows(&self) -> std::ops::Range<u16> {
        let first = self.y_top.floor().max(0.0) as u16;
        let last = (self.y_top + self.height).floor().max(0.0) as u16;
        first..last
    }

    /// Text-area column of the segment.
    pub fn column(&self) -> u16 {
        self.x.round().max(0.0) as u16
    }
}

/// Snapshot used to derive guide events after an edit or movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub version: u64,
    pub cursor_row: usize,
    pub scroll_top: usize,
}

pub struct Editor {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll_top: usize,
    view_rows: usize,
    version: u64,
    modified: bool,
    themes: ThemeRegistry,
    theme_name: String,
    overlay: Option<GuideOverlay>,
    next_guide_id: u64,
}

impl Editor {
    pub fn new(content: &str, themes: ThemeRegistry, theme_name: impl Into<String>) -> Self {
        let expanded = content.replace('\t', &" ".repeat(TAB_WIDTH));
        let lines = expanded
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Self {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            scroll_top: 0,
            view_rows: 1,
            version: 0,
            modified: false,
            themes,
            theme_name: theme_name.into(),
            overlay: None,
            next_guide_id: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn view_rows(&self) -> usize {
        self.view_rows
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn overlay(&self) -> Option<GuideOverlay> {
        self.overlay
    }

    pub fn view_state(&self) -> ViewState {
        ViewState {
            version: self.version,
            cursor_row: self.cursor_row,
            scroll_top: self.scroll_top,
        }
    }

    pub fn set_view_rows(&mut self, rows: usize) {
        self.view_rows = rows.max(1);
        self.ensure_cursor_visible();
    }

    /// Display width of the first `col` characters of `row`.
    pub fn display_x(&self, row: usize, col: usize) -> usize {
        self.lines
            .get(row)
            .map(|line| line.chars().take(col).map(char_cells).sum())
            .unwrap_or(0)
    }

    fn line_chars(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |line| line.chars().count())
    }

    fn clamp_col(&mut self) {
        self.cursor_col = self.cursor_col.min(self.line_chars(self.cursor_row));
    }

    fn ensure_cursor_visible(&mut self) {
        if self.cursor_row < self.scroll_top {
            self.scroll_top = self.cursor_row;
        } else if self.cursor_row >= self.scroll_top + self.view_rows {
            self.scroll_top = self.cursor_row + 1 - self.view_rows;
        }
    }

    fn edited(&mut self) {
        self.version += 1;
        self.modified = true;
        self.ensure_cursor_visible();
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.line_chars(self.cursor_row);
        }
        self.ensure_cursor_visible();
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.line_chars(self.cursor_row) {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
        self.ensure_cursor_visible();
    }

    pub fn move_vertical(&mut self, delta: isize) {
        let last = self.lines.len().saturating_sub(1) as isize;
        self.cursor_row = (self.cursor_row as isize + delta).clamp(0, last) as usize;
        self.clamp_col();
        self.ensure_cursor_visible();
    }

    pub fn move_home(&mut self) {
        // Smart home: first non-blank character, then column 0.
        let indent = self
            .lines
            .get(self.cursor_row)
            .map_or(0, |line| indent_guide::indent_width(line));
        self.cursor_col = if self.cursor_col == indent { 0 } else { indent };
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.line_chars(self.cursor_row);
    }

    pub fn page(&mut self, direction: isize) {
        self.move_vertical(direction * self.view_rows as isize);
    }

    /// Scroll the view without moving the cursor.
    pub fn scroll_by(&mut self, delta: isize) {
        let max_top = self.lines.len().saturating_sub(1) as isize;
        self.scroll_top = (self.scroll_top as isize + delta).clamp(0, max_top) as usize;
    }

    pub fn insert_char(&mut self, ch: char) {
        let col = self.cursor_col;
        let line = &mut self.lines[self.cursor_row];
        let at = byte_index(line, col);
        line.insert(at, ch);
        self.cursor_col += 1;
        self.edited();
    }

    pub fn insert_tab(&mut self) {
        for _ in 0..TAB_WIDTH {
            self.insert_char(' ');
        }
    }

    /// Split the line at the cursor, copying the current line's leading whitespace.
    pub fn insert_newline(&mut self) {
        let col = self.cursor_col;
        let line = &mut self.lines[self.cursor_row];
        let at = byte_index(line, col);
        let rest = line.split_off(at);
        let indent: String = line.chars().take_while(|ch| ch.is_whitespace()).collect();

        self.cursor_row += 1;
        self.cursor_col = indent.chars().count();
        self.lines.insert(self.cursor_row, indent + rest.trim_start());
        self.edited();
    }

    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let col = self.cursor_col - 1;
            let line = &mut self.lines[self.cursor_row];
            let at = byte_index(line, col);
            line.remove(at);
            self.cursor_col = col;
        } else if self.cursor_row > 0 {
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.line_chars(self.cursor_row);
            self.lines[self.cursor_row].push_str(&line);
        } else {
            return;
        }
        self.edited();
    }

    pub fn delete_forward(&mut self) {
        if self.cursor_col < self.line_chars(self.cursor_row) {
            let col = self.cursor_col;
            let line = &mut self.lines[self.cursor_row];
            let at = byte_index(line, col);
            line.remove(at);
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
        } else {
            return;
        }
        self.edited();
    }
}

impl HitTest for Editor {
    fn hit_test(&self, line: usize, column: TextColumn) -> Option<PixelBox> {
        let row = line.checked_sub(1)?;
        if row < self.scroll_top || row >= self.scroll_top + self.view_rows {
            return None;
        }
        let text = self.lines.get(row)?;
        let len = text.chars().count();
        let (col, width) = match column {
            TextColumn::Index(col) if col < len => (col, text.chars().nth(col).map_or(1, char_cells)),
            TextColumn::Index(col) if col == len => (col, 1),
            TextColumn::Index(_) => return None,
            TextColumn::LineEnd => (len, 1),
        };
        let x = self.display_x(row, col) as f32;
        let y = (row - self.scroll_top) as f32;
        Some(PixelBox::new(x, y, width as f32, 1.0))
    }
}

impl GuideHost for Editor {
    type Handle = u64;

    fn active_document_text(&self) -> Option<String> {
        Some(self.text())
    }

    fn cursor_line(&self) -> usize {
        self.cursor_row + 1
    }

    fn viewport_line_range(&self) -> ViewportRange {
        let top = self.scroll_top + 1;
        let bottom = (self.scroll_top + self.view_rows).min(self.lines.len()).max(top);
        ViewportRange::new(top, bottom)
    }

    fn viewport_pixel_height(&self) -> f32 {
        self.view_rows as f32
    }

    fn font_metrics(&self) -> Option<FontMetrics> {
        Some(FontMetrics::new(1.0, 1.0))
    }

    fn guide_color(&self) -> Result<Color, ThemeError> {
        self.themes.guide_color(&self.theme_name)
    }

    fn draw_guide(&mut self, x: f32, y_top: f32, height: f32, color: Color) -> u64 {
        self.next_guide_id += 1;
        let id = self.next_guide_id;
        self.overlay = Some(GuideOverlay {
            id,
            x,
            y_top,
            height,
            color,
        });
        id
    }

    fn clear_guide(&mut self, handle: u64) {
        if self.overlay.is_some_and(|overlay| overlay.id == handle) {
            self.overlay = None;
        }
    }
}

fn char_cells(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(idx, _)| idx)
}
