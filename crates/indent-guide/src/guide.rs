//! Event-driven guide controller
//!
//! [`IndentGuide`] ties the pieces together. On every host event it clears the guide that is
//! currently drawn, refreshes its [`LineBuffer`] if the event can change the document, locates
//! the block around the cursor, computes the segment geometry and asks the host to draw it.
//!
//! The controller never returns errors to the host. Every failure (desynchronized cursor line,
//! missing metrics, hit-test miss, theme resolution failure) degrades to "no guide" or to the
//! fallback color, and is reported through `tracing` and [`IndentGuide::last_placement`].
//!
//! # Example
//!
//! ```rust
//! use indent_guide::{
//!     Color, FontMetrics, GuideConfig, GuideHost, HitTest, IndentGuide, PixelBox, Placement,
//!     TextColumn, ThemeError, ViewportRange,
//! };
//!
//! struct Host {
//!     text: String,
//!     cursor: usize,
//!     drawn: Option<(f32, f32, f32)>,
//! }
//!
//! impl HitTest for Host {
//!     fn hit_test(&self, line: usize, column: TextColumn) -> Option<PixelBox> {
//!         let x = match column {
//!             TextColumn::Index(col) => col as f32,
//!             TextColumn::LineEnd => 10.0,
//!         };
//!         Some(PixelBox::new(x, (line - 1) as f32, 1.0, 1.0))
//!     }
//! }
//!
//! impl GuideHost for Host {
//!     type Handle = ();
//!     fn active_document_text(&self) -> Option<String> { Some(self.text.clone()) }
//!     fn cursor_line(&self) -> usize { self.cursor }
//!     fn viewport_line_range(&self) -> ViewportRange { ViewportRange::new(1, 20) }
//!     fn viewport_pixel_height(&self) -> f32 { 20.0 }
//!     fn font_metrics(&self) -> Option<FontMetrics> { Some(FontMetrics::new(1.0, 1.0)) }
//!     fn guide_color(&self) -> Result<Color, ThemeError> { Ok(Color::new(0, 0, 0)) }
//!     fn draw_guide(&mut self, x: f32, y_top: f32, height: f32, _color: Color) {
//!         self.drawn = Some((x, y_top, height));
//!     }
//!     fn clear_guide(&mut self, _handle: ()) { self.drawn = None; }
//! }
//!
//! let mut host = Host { text: "if x:\n    a\n    b\n".into(), cursor: 2, drawn: None };
//! let mut guide = IndentGuide::new(GuideConfig::default());
//!
//! guide.on_focus_gained(&mut host);
//! assert!(matches!(guide.last_placement(), Placement::Drawn { .. }));
//! assert!(host.drawn.is_some());
//!
//! guide.on_focus_lost(&mut host);
//! assert!(host.drawn.is_none());
//! ```

use crate::block::{BlockLocator, BlockRange};
use crate::config::{GuideAnchor, GuideConfig};
use crate::error::GuideError;
use crate::geometry::{GuideGeometry, GuideGeometryCalculator, Viewport};
use crate::host::GuideHost;
use crate::line_buffer::LineBuffer;
use tracing::{debug, trace, warn};

/// Host events the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideEvent {
    /// The document text changed.
    ContentChanged,
    /// The primary cursor moved.
    CursorMoved,
    /// The viewport scrolled (or was resized).
    Scrolled,
    /// The editor gained focus; the active document may differ from the previous one.
    FocusGained,
    /// The editor lost focus.
    FocusLost,
}

impl GuideEvent {
    /// Whether this event requires the line buffer to be refreshed from the host.
    pub fn refreshes_buffer(self) -> bool {
        matches!(self, GuideEvent::ContentChanged | GuideEvent::FocusGained)
    }
}

/// Outcome of the most recent event pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// No event has been handled yet.
    Idle,
    /// A guide was drawn.
    Drawn {
        /// Block the guide marks.
        range: BlockRange,
        /// Geometry handed to the host.
        geometry: GuideGeometry,
    },
    /// The host has no active document.
    NoDocument,
    /// The cursor line is top-level or blank.
    NotIndented,
    /// The cursor line is outside the buffer (host and buffer are out of sync).
    InvalidLine,
    /// The host could not provide usable font metrics.
    NoMetrics,
    /// The block exists but cannot be drawn right now (off-screen, hit-test miss, or zero
    /// height).
    Hidden {
        /// Block that was located.
        range: BlockRange,
    },
    /// Focus was lost; the guide was removed.
    Cleared,
}

/// The indent guide controller.
///
/// Holds the only state that outlives an event pass: the line buffer for the active document
/// and the handle of the currently drawn guide (at most one).
pub struct IndentGuide<H: GuideHost> {
    config: GuideConfig,
    buffer: LineBuffer,
    has_document: bool,
    locator: BlockLocator,
    calculator: GuideGeometryCalculator,
    current: Option<H::Handle>,
    last: Placement,
}

impl<H: GuideHost> IndentGuide<H> {
    /// Create a controller with an empty buffer.
    pub fn new(config: GuideConfig) -> Self {
        Self {
            locator: BlockLocator::new(config.scan_boundary),
            calculator: GuideGeometryCalculator::new(config.bottom_cap, config.horizontal_offset),
            config,
            buffer: LineBuffer::new(),
            has_document: false,
            current: None,
            last: Placement::Idle,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    /// The cached document lines.
    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    /// Outcome of the most recent event pass.
    pub fn last_placement(&self) -> Placement {
        self.last
    }

    /// Whether a guide is currently drawn.
    pub fn has_guide(&self) -> bool {
        self.current.is_some()
    }

    /// Document content changed.
    pub fn on_content_changed(&mut self, host: &mut H) {
        self.handle(GuideEvent::ContentChanged, host);
    }

    /// Cursor moved.
    pub fn on_cursor_moved(&mut self, host: &mut H) {
        self.handle(GuideEvent::CursorMoved, host);
    }

    /// Viewport scrolled.
    pub fn on_scrolled(&mut self, host: &mut H) {
        self.handle(GuideEvent::Scrolled, host);
    }

    /// Editor gained focus.
    pub fn on_focus_gained(&mut self, host: &mut H) {
        self.handle(GuideEvent::FocusGained, host);
    }

    /// Editor lost focus.
    pub fn on_focus_lost(&mut self, host: &mut H) {
        self.handle(GuideEvent::FocusLost, host);
    }

    /// Handle a single event.
    pub fn handle(&mut self, event: GuideEvent, host: &mut H) {
        self.handle_batch([event], host);
    }

    /// Handle a batch of events as one pass.
    ///
    /// The batch is coalesced: the guide is cleared once, the buffer is refreshed at most once
    /// (and always before the block is located), and if the last focus event in the batch is a
    /// focus loss no replacement guide is drawn. An empty batch does nothing.
    pub fn handle_batch<I>(&mut self, events: I, host: &mut H)
    where
        I: IntoIterator<Item = GuideEvent>,
    {
        let mut any = false;
        let mut refresh = false;
        let mut focused = None;
        for event in events {
            trace!(?event, "indent guide event");
            any = true;
            refresh |= event.refreshes_buffer();
            match event {
                GuideEvent::FocusGained => focused = Some(true),
                GuideEvent::FocusLost => focused = Some(false),
                _ => {}
            }
        }
        if !any {
            return;
        }

        self.clear(host);
        if refresh {
            self.refresh(host);
        }

        self.last = if focused == Some(false) {
            Placement::Cleared
        } else {
            self.place(host)
        };
        debug!(placement = ?self.last, "indent guide pass finished");
    }

    /// Remove the current guide, if any.
    pub fn clear(&mut self, host: &mut H) {
        if let Some(handle) = self.current.take() {
            host.clear_guide(handle);
        }
    }

    fn refresh(&mut self, host: &H) {
        match host.active_document_text() {
            Some(text) => {
                self.buffer.refresh(&text);
                self.has_document = true;
            }
            None => {
                self.buffer.clear();
                self.has_document = false;
            }
        }
        trace!(
            lines = self.buffer.line_count(),
            has_document = self.has_document,
            "line buffer refreshed"
        );
    }

    fn place(&mut self, host: &mut H) -> Placement {
        if !self.has_document {
            return Placement::NoDocument;
        }

        let cursor_line = host.cursor_line();
        let range = match self.locator.locate(&self.buffer, cursor_line) {
            Ok(Some(range)) => range,
            Ok(None) => return Placement::NotIndented,
            Err(err) => {
                debug!(%err, "cursor line out of sync with line buffer");
                return Placement::InvalidLine;
            }
        };

        let Some(metrics) = host.font_metrics().filter(|metrics| metrics.is_usable()) else {
            return Placement::NoMetrics;
        };

        let (anchored, anchor_indent) = match self.anchor(range) {
            Ok(anchor) => anchor,
            Err(err) => {
                debug!(%err, "anchor line out of sync with line buffer");
                return Placement::InvalidLine;
            }
        };

        let viewport = Viewport {
            lines: host.viewport_line_range(),
            pixel_height: host.viewport_pixel_height(),
            vertical_padding: host.vertical_padding(),
        };
        let Some(geometry) =
            self.calculator
                .compute(&anchored, anchor_indent, &viewport, metrics, &*host)
        else {
            return Placement::Hidden { range };
        };

        let color = match host.guide_color() {
            Ok(color) => color,
            Err(err) => {
                warn!(%err, fallback = %self.config.fallback_color, "guide color unavailable");
                self.config.fallback_color
            }
        };

        self.current = Some(host.draw_guide(geometry.x, geometry.y_top, geometry.height, color));
        Placement::Drawn { range, geometry }
    }

    /// The range handed to geometry and the indent width of its first line.
    fn anchor(&self, range: BlockRange) -> Result<(BlockRange, usize), GuideError> {
        let anchored = match (self.config.anchor, range.opener) {
            (GuideAnchor::Opener, Some(opener)) => BlockRange {
                start: opener,
                ..range
            },
            _ => range,
        };
        let indent = self.buffer.indent_at(anchored.start)?.unwrap_or_default();
        Ok((anchored, indent))
    }
}
