use indent_guide::{
    Color, FontMetrics, GuideAnchor, GuideConfig, GuideEvent, GuideHost, HitTest, IndentGuide,
    PixelBox, Placement, TextColumn, ThemeError, ViewportRange,
};
use pretty_assertions::assert_eq;
use std::cell::Cell;

const LINE_HEIGHT: f32 = 24.0;
const CHAR_WIDTH: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    Draw {
        id: u32,
        x: f32,
        y_top: f32,
        height: f32,
        color: Color,
    },
    Clear(u32),
}

/// In-memory editor that records every draw/clear call.
struct FakeHost {
    text: Option<String>,
    cursor: usize,
    top: usize,
    rows: usize,
    metrics: Option<FontMetrics>,
    color: Option<Color>,
    calls: Vec<Call>,
    live: Option<u32>,
    next_id: u32,
    text_reads: Cell<usize>,
}

impl FakeHost {
    fn new(text: &str, cursor: usize) -> Self {
        Self {
            text: Some(text.to_string()),
            cursor,
            top: 1,
            rows: 20,
            metrics: Some(FontMetrics::new(LINE_HEIGHT, CHAR_WIDTH)),
            color: Some(Color::new(0x33, 0x66, 0x99)),
            calls: Vec::new(),
            live: None,
            next_id: 0,
            text_reads: Cell::new(0),
        }
    }

    fn line_len(&self, line: usize) -> Option<usize> {
        let text = self.text.as_ref()?;
        text.split('\n').nth(line - 1).map(|l| l.chars().count())
    }

    fn draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Draw { .. }))
            .count()
    }
}

impl HitTest for FakeHost {
    fn hit_test(&self, line: usize, column: TextColumn) -> Option<PixelBox> {
        if line < self.top || line >= self.top + self.rows {
            return None;
        }
        let len = self.line_len(line)?;
        let col = match column {
            TextColumn::Index(col) if col <= len => col,
            TextColumn::Index(_) => return None,
            TextColumn::LineEnd => len,
        };
        let y = (line - self.top) as f32 * LINE_HEIGHT;
        Some(PixelBox::new(
            col as f32 * CHAR_WIDTH,
            y,
            CHAR_WIDTH,
            LINE_HEIGHT,
        ))
    }
}

impl GuideHost for FakeHost {
    type Handle = u32;

    fn active_document_text(&self) -> Option<String> {
        self.text_reads.set(self.text_reads.get() + 1);
        self.text.clone()
    }

    fn cursor_line(&self) -> usize {
        self.cursor
    }

    fn viewport_line_range(&self) -> ViewportRange {
        ViewportRange::new(self.top, self.top + self.rows - 1)
    }

    fn viewport_pixel_height(&self) -> f32 {
        self.rows as f32 * LINE_HEIGHT
    }

    fn font_metrics(&self) -> Option<FontMetrics> {
        self.metrics
    }

    fn guide_color(&self) -> Result<Color, ThemeError> {
        self.color
            .ok_or_else(|| ThemeError::UnknownTheme("Missing".to_string()))
    }

    fn draw_guide(&mut self, x: f32, y_top: f32, height: f32, color: Color) -> u32 {
        assert!(self.live.is_none(), "a guide is already live");
        self.next_id += 1;
        let id = self.next_id;
        self.calls.push(Call::Draw {
            id,
            x,
            y_top,
            height,
            color,
        });
        self.live = Some(id);
        id
    }

    fn clear_guide(&mut self, handle: u32) {
        assert_eq!(self.live, Some(handle), "clearing a guide that is not live");
        self.calls.push(Call::Clear(handle));
        self.live = None;
    }
}

const SOURCE: &str = "def f(x):\n    if x:\n        a = 1\n\n        b = 2\n    return x\n";

#[test]
fn test_focus_gained_draws_guide_under_opener() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());

    guide.on_focus_gained(&mut host);

    let Placement::Drawn { range, geometry } = guide.last_placement() else {
        panic!("expected a guide, got {:?}", guide.last_placement());
    };
    assert_eq!((range.start, range.end, range.opener), (3, 5, Some(2)));
    // Anchored at line 2, column 4: bottom edge of row 1.
    assert_eq!(geometry.x, 4.0 * CHAR_WIDTH);
    assert_eq!(geometry.y_top, 48.0);
    // Line 5 ends at row 4, bottom edge 120, plus half of the 25px cap.
    assert_eq!(geometry.y_bottom(), 132.5);
    assert_eq!(
        host.calls,
        vec![Call::Draw {
            id: 1,
            x: 32.0,
            y_top: 48.0,
            height: 84.5,
            color: Color::new(0x33, 0x66, 0x99),
        }]
    );
}

#[test]
fn test_block_start_anchor() {
    let mut host = FakeHost::new(SOURCE, 3);
    let config = GuideConfig {
        anchor: GuideAnchor::BlockStart,
        ..GuideConfig::default()
    };
    let mut guide = IndentGuide::new(config);

    guide.on_focus_gained(&mut host);

    let Placement::Drawn { geometry, .. } = guide.last_placement() else {
        panic!("expected a guide");
    };
    assert_eq!(geometry.x, 8.0 * CHAR_WIDTH);
    assert_eq!(geometry.y_top, 72.0);
}

#[test]
fn test_cursor_move_replaces_guide() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);

    host.cursor = 6;
    guide.on_cursor_moved(&mut host);

    let Placement::Drawn { range, .. } = guide.last_placement() else {
        panic!("expected a guide");
    };
    assert_eq!((range.start, range.end, range.opener), (2, 6, Some(1)));
    assert_eq!(host.calls[1], Call::Clear(1));
    assert!(matches!(host.calls[2], Call::Draw { id: 2, .. }));
    assert_eq!(host.live, Some(2));
}

#[test]
fn test_top_level_cursor_clears_without_replacement() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);

    host.cursor = 1;
    guide.on_cursor_moved(&mut host);

    assert_eq!(guide.last_placement(), Placement::NotIndented);
    assert!(!guide.has_guide());
    assert_eq!(host.live, None);
}

#[test]
fn test_focus_lost_clears_guide() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);

    guide.on_focus_lost(&mut host);

    assert_eq!(guide.last_placement(), Placement::Cleared);
    assert_eq!(host.calls.last(), Some(&Call::Clear(1)));
    assert_eq!(host.draws(), 1);
}

#[test]
fn test_content_change_refreshes_before_locating() {
    let mut host = FakeHost::new("x = 1\ny = 2", 2);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);
    assert_eq!(guide.last_placement(), Placement::NotIndented);

    host.text = Some("if x:\n    y = 2".to_string());
    guide.on_content_changed(&mut host);

    assert!(matches!(guide.last_placement(), Placement::Drawn { .. }));
    assert_eq!(guide.buffer().line_at(2).unwrap(), "    y = 2");
}

#[test]
fn test_cursor_and_scroll_events_do_not_reread_text() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);
    assert_eq!(host.text_reads.get(), 1);

    guide.on_cursor_moved(&mut host);
    guide.on_scrolled(&mut host);
    assert_eq!(host.text_reads.get(), 1);
}

#[test]
fn test_scrolled_past_block_hides_guide() {
    let text = (0..60)
        .map(|i| if i == 0 { "if x:".to_string() } else { format!("    line {i}") })
        .chain(std::iter::once("done".to_string()))
        .collect::<Vec<_>>()
        .join("\n");
    let mut host = FakeHost::new(&text, 5);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);
    assert!(matches!(guide.last_placement(), Placement::Drawn { .. }));

    // Block 2..=60 still covers the viewport: clamped at both ends.
    host.top = 20;
    guide.on_scrolled(&mut host);
    let Placement::Drawn { geometry, .. } = guide.last_placement() else {
        panic!("expected a clamped guide");
    };
    assert_eq!(geometry.y_top, 0.0);
    assert_eq!(geometry.height, 20.0 * LINE_HEIGHT);

    // Viewport entirely below the block.
    host.top = 61;
    guide.on_scrolled(&mut host);
    assert!(matches!(guide.last_placement(), Placement::Hidden { .. }));
    assert_eq!(host.live, None);
}

#[test]
fn test_cursor_desync_is_silent() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);

    host.cursor = 99;
    guide.on_cursor_moved(&mut host);

    assert_eq!(guide.last_placement(), Placement::InvalidLine);
    assert_eq!(host.live, None);
}

#[test]
fn test_missing_metrics_draw_nothing() {
    let mut host = FakeHost::new(SOURCE, 3);
    host.metrics = None;
    let mut guide = IndentGuide::new(GuideConfig::default());

    guide.on_focus_gained(&mut host);

    assert_eq!(guide.last_placement(), Placement::NoMetrics);
    assert!(host.calls.is_empty());
}

#[test]
fn test_no_document() {
    let mut host = FakeHost::new(SOURCE, 3);
    host.text = None;
    let mut guide = IndentGuide::new(GuideConfig::default());

    guide.on_focus_gained(&mut host);

    assert_eq!(guide.last_placement(), Placement::NoDocument);
    assert_eq!(guide.buffer().line_count(), 1);
}

#[test]
fn test_theme_failure_uses_fallback_color() {
    let mut host = FakeHost::new(SOURCE, 3);
    host.color = None;
    let config = GuideConfig {
        fallback_color: Color::new(1, 2, 3),
        ..GuideConfig::default()
    };
    let mut guide = IndentGuide::new(config);

    guide.on_focus_gained(&mut host);

    assert!(matches!(
        host.calls[0],
        Call::Draw {
            color: Color { r: 1, g: 2, b: 3 },
            ..
        }
    ));
}

#[test]
fn test_batch_coalesces_refresh_and_clear() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);

    host.cursor = 6;
    guide.handle_batch(
        [
            GuideEvent::ContentChanged,
            GuideEvent::CursorMoved,
            GuideEvent::ContentChanged,
            GuideEvent::Scrolled,
        ],
        &mut host,
    );

    assert_eq!(host.text_reads.get(), 2);
    assert_eq!(host.draws(), 2);
    assert_eq!(host.calls[1], Call::Clear(1));
    assert_eq!(host.calls.len(), 3);
}

#[test]
fn test_batch_ending_in_focus_loss_draws_nothing() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);

    host.text = Some("if y:\n    z".to_string());
    guide.handle_batch(
        [GuideEvent::ContentChanged, GuideEvent::FocusLost, GuideEvent::Scrolled],
        &mut host,
    );

    assert_eq!(guide.last_placement(), Placement::Cleared);
    assert_eq!(host.live, None);
    // The content change was still applied.
    assert_eq!(guide.buffer().line_count(), 2);
}

#[test]
fn test_empty_batch_is_a_no_op() {
    let mut host = FakeHost::new(SOURCE, 3);
    let mut guide = IndentGuide::new(GuideConfig::default());
    guide.on_focus_gained(&mut host);

    guide.handle_batch(std::iter::empty(), &mut host);

    assert_eq!(host.calls.len(), 1);
    assert!(guide.has_guide());
}

#[test]
fn test_legacy_config_stops_short_of_last_line() {
    let mut host = FakeHost::new("if x:\n    a\n    b", 2);
    let mut guide = IndentGuide::new(GuideConfig::legacy());

    guide.on_focus_gained(&mut host);

    let Placement::Drawn { range, .. } = guide.last_placement() else {
        panic!("expected a guide");
    };
    assert_eq!((range.start, range.end), (2, 2));
}
