//! Guide geometry
//!
//! Converts a [`BlockRange`] into a drawable vertical segment, taking the current viewport and
//! font metrics into account. Blocks partially scrolled out of view are clamped to the visible
//! area; blocks entirely outside it produce no geometry at all, without any hit testing.

use crate::block::BlockRange;
use crate::host::HitTest;
use serde::{Deserialize, Serialize};

/// Reference bottom cap offset, in pixels, at [`REFERENCE_LINE_HEIGHT`].
pub const REFERENCE_BOTTOM_OFFSET: f32 = 25.0;

/// Line height the bottom cap offset is calibrated against.
pub const REFERENCE_LINE_HEIGHT: f32 = 24.0;

/// Font metrics of the active editor font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Height of one text line in pixels.
    pub line_height: f32,
    /// Advance width of one character in pixels.
    pub char_width: f32,
}

impl FontMetrics {
    /// Create metrics from line height and character width.
    pub fn new(line_height: f32, char_width: f32) -> Self {
        Self {
            line_height,
            char_width,
        }
    }

    /// Whether these metrics can be used for layout (finite, positive line height,
    /// non-negative character width).
    pub fn is_usable(&self) -> bool {
        self.line_height.is_finite()
            && self.char_width.is_finite()
            && self.line_height > 0.0
            && self.char_width >= 0.0
    }
}

/// Bounding box of a character cell, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Cell width.
    pub width: f32,
    /// Cell height.
    pub height: f32,
}

impl PixelBox {
    /// Create a bounding box.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Column addressed by a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColumn {
    /// Character index within the line (0-based).
    Index(usize),
    /// The end-of-line position (just past the last character).
    LineEnd,
}

/// 1-based inclusive range of visible lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportRange {
    /// First visible line.
    pub top: usize,
    /// Last visible line.
    pub bottom: usize,
}

impl ViewportRange {
    /// Create a viewport range.
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }

    /// Returns `true` if `line` is visible.
    pub fn contains(&self, line: usize) -> bool {
        (self.top..=self.bottom).contains(&line)
    }
}

/// Viewport state for a single geometry computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible line range.
    pub lines: ViewportRange,
    /// Height of the visible text area in pixels.
    pub pixel_height: f32,
    /// Host vertical padding applied to hit-tested edges.
    pub vertical_padding: f32,
}

/// Bottom cap offset that scales linearly with the line height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaledOffset {
    /// Offset in pixels at `reference_line_height`.
    pub reference_offset: f32,
    /// Line height the offset is calibrated against.
    pub reference_line_height: f32,
}

impl ScaledOffset {
    /// Offset for the given line height.
    pub fn scaled(&self, line_height: f32) -> f32 {
        if self.reference_line_height <= 0.0 {
            return 0.0;
        }
        self.reference_offset * line_height / self.reference_line_height
    }
}

impl Default for ScaledOffset {
    fn default() -> Self {
        Self {
            reference_offset: REFERENCE_BOTTOM_OFFSET,
            reference_line_height: REFERENCE_LINE_HEIGHT,
        }
    }
}

/// A drawable guide segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideGeometry {
    /// Horizontal position of the segment.
    pub x: f32,
    /// Top of the segment.
    pub y_top: f32,
    /// Segment height (always positive).
    pub height: f32,
}

impl GuideGeometry {
    /// Bottom of the segment.
    pub fn y_bottom(&self) -> f32 {
        self.y_top + self.height
    }
}

/// Computes guide geometry from block ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuideGeometryCalculator {
    bottom_cap: ScaledOffset,
    horizontal_offset: f32,
}

impl GuideGeometryCalculator {
    /// Create a calculator with the given bottom cap and horizontal offset.
    pub fn new(bottom_cap: ScaledOffset, horizontal_offset: f32) -> Self {
        Self {
            bottom_cap,
            horizontal_offset,
        }
    }

    /// Compute the guide segment for `range`, whose first line is indented by
    /// `start_indent` characters.
    ///
    /// Returns `None` when the block is entirely outside the viewport, when a required hit
    /// test misses, when the metrics are unusable, or when the resulting segment would have
    /// no height.
    pub fn compute<T>(
        &self,
        range: &BlockRange,
        start_indent: usize,
        viewport: &Viewport,
        metrics: FontMetrics,
        hit_test: &T,
    ) -> Option<GuideGeometry>
    where
        T: HitTest + ?Sized,
    {
        let visible = viewport.lines;
        if range.end < visible.top || range.start > visible.bottom {
            return None;
        }
        if !metrics.is_usable() {
            return None;
        }

        let y_top = if range.start < visible.top {
            0.0
        } else {
            let cell = hit_test.hit_test(range.start, TextColumn::Index(start_indent))?;
            cell.bottom() - viewport.vertical_padding
        };

        let y_bottom = if range.end > visible.bottom {
            viewport.pixel_height
        } else {
            let cell = hit_test.hit_test(range.end, TextColumn::LineEnd)?;
            cell.bottom()
                + viewport.vertical_padding
                + self.bottom_cap.scaled(metrics.line_height) / 2.0
        };

        let height = y_bottom - y_top;
        if !height.is_finite() || height <= 0.0 {
            return None;
        }

        Some(GuideGeometry {
            x: start_indent as f32 * metrics.char_width + self.horizontal_offset,
            y_top,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> BlockRange {
        BlockRange {
            start,
            end,
            indent: 4,
            opener: None,
        }
    }

    fn viewport(top: usize, bottom: usize) -> Viewport {
        Viewport {
            lines: ViewportRange::new(top, bottom),
            pixel_height: (bottom - top + 1) as f32 * 24.0,
            vertical_padding: 0.0,
        }
    }

    fn grid(top: usize) -> impl Fn(usize, TextColumn) -> Option<PixelBox> {
        move |line, column| {
            let row = line.checked_sub(top)? as f32;
            let x = match column {
                TextColumn::Index(col) => col as f32 * 8.0,
                TextColumn::LineEnd => 80.0,
            };
            Some(PixelBox::new(x, row * 24.0, 8.0, 24.0))
        }
    }

    #[test]
    fn test_scaled_offset() {
        let cap = ScaledOffset::default();
        assert_eq!(cap.scaled(24.0), 25.0);
        assert_eq!(cap.scaled(48.0), 50.0);
        assert_eq!(
            ScaledOffset {
                reference_offset: 25.0,
                reference_line_height: 0.0
            }
            .scaled(24.0),
            0.0
        );
    }

    #[test]
    fn test_visible_block() {
        let calc = GuideGeometryCalculator::default();
        let geometry = calc
            .compute(
                &range(12, 20),
                4,
                &viewport(10, 30),
                FontMetrics::new(24.0, 8.0),
                &grid(10),
            )
            .unwrap();

        assert_eq!(geometry.x, 32.0);
        assert_eq!(geometry.y_top, 72.0);
        assert_eq!(geometry.y_bottom(), 276.5);
        assert_eq!(geometry.height, 204.5);
    }

    #[test]
    fn test_horizontal_offset_is_added() {
        let calc = GuideGeometryCalculator::new(ScaledOffset::default(), 2.0);
        let geometry = calc
            .compute(
                &range(12, 20),
                4,
                &viewport(10, 30),
                FontMetrics::new(24.0, 8.0),
                &grid(10),
            )
            .unwrap();
        assert_eq!(geometry.x, 34.0);
    }

    #[test]
    fn test_unusable_metrics() {
        let calc = GuideGeometryCalculator::default();
        let result = calc.compute(
            &range(12, 20),
            4,
            &viewport(10, 30),
            FontMetrics::new(0.0, 8.0),
            &grid(10),
        );
        assert_eq!(result, None);
        assert!(!FontMetrics::new(f32::NAN, 8.0).is_usable());
        assert!(!FontMetrics::new(24.0, -1.0).is_usable());
    }

    #[test]
    fn test_viewport_range_contains() {
        let lines = ViewportRange::new(3, 5);
        assert!(lines.contains(3));
        assert!(lines.contains(5));
        assert!(!lines.contains(6));
    }
}
