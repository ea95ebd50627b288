//! Host collaborator interfaces.
//!
//! The engine never talks to a widget toolkit directly. Everything it needs from the editor
//! (document text, cursor, viewport, font metrics, character hit testing, colors, and the
//! drawing primitive) is supplied through these traits.

use crate::error::ThemeError;
use crate::geometry::{FontMetrics, PixelBox, TextColumn, ViewportRange};
use crate::theme::Color;

/// Translates a text position into the on-screen bounding box of its character cell.
///
/// Closures of the form `Fn(usize, TextColumn) -> Option<PixelBox>` implement this trait, so
/// tests and simple hosts can pass a function directly.
pub trait HitTest {
    /// Bounding box of the cell at the 1-based `line` and `column`, or `None` when the cell is
    /// not currently rendered (for example, scrolled out of view).
    fn hit_test(&self, line: usize, column: TextColumn) -> Option<PixelBox>;
}

impl<F> HitTest for F
where
    F: Fn(usize, TextColumn) -> Option<PixelBox>,
{
    fn hit_test(&self, line: usize, column: TextColumn) -> Option<PixelBox> {
        self(line, column)
    }
}

/// The editor hosting the guide.
///
/// All methods are called synchronously from within one event pass on the UI thread.
pub trait GuideHost: HitTest {
    /// Opaque handle to a drawn guide primitive.
    type Handle;

    /// Full text of the focused document, or `None` when no document is active.
    fn active_document_text(&self) -> Option<String>;

    /// 1-based line of the primary cursor.
    fn cursor_line(&self) -> usize;

    /// 1-based inclusive range of currently visible lines.
    fn viewport_line_range(&self) -> ViewportRange;

    /// Height of the visible text area in pixels.
    fn viewport_pixel_height(&self) -> f32;

    /// Vertical padding between the widget edge and the text area.
    fn vertical_padding(&self) -> f32 {
        0.0
    }

    /// Metrics of the active font, or `None` if not yet known.
    fn font_metrics(&self) -> Option<FontMetrics>;

    /// Guide color resolved from the host's theme.
    fn guide_color(&self) -> Result<Color, ThemeError>;

    /// Draw a vertical guide segment and return a handle to it.
    fn draw_guide(&mut self, x: f32, y_top: f32, height: f32, color: Color) -> Self::Handle;

    /// Remove a previously drawn guide.
    fn clear_guide(&mut self, handle: Self::Handle);
}
