//! Indent guide TUI demo
//!
//! A small terminal editor built with crossterm and ratatui that hosts the `indent-guide`
//! engine. The guide is drawn as a `│` column hanging under the statement that opens the block
//! the cursor is in.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p indent-guide-tui -- <file_path> [--theme NAME] [--themes PATH] [--config PATH]
//! ```
//!
//! Set `INDENT_GUIDE_LOG=/tmp/guide.log` to write engine logs to a file (`RUST_LOG` filters).
//!
//! # Keys
//!
//! - Arrow keys / Home / End / PageUp / PageDown: move the cursor
//! - Mouse wheel: scroll without moving the cursor
//! - Enter: new line (keeps indentation), Tab: indent, Backspace/Delete: delete
//! - Ctrl+S: save, Ctrl+X: quit

mod editor;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use editor::{Editor, ViewState};
use indent_guide::{GuideConfig, GuideEvent, IndentGuide, Placement, ThemeRegistry};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};
use std::{
    env,
    fs::{self, File},
    io::stdout,
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "INDENT_GUIDE_LOG";
const DEFAULT_THEME: &str = "Default Dark";
const GUIDE_SYMBOL: &str = "│";

const BUILTIN_THEMES: &str = r##"{
    "Default Light": {
        "settings": {
            "surrounding_parens": { "foreground": "#0000ff", "background": "#e0e0e0" },
            "comment": { "foreground": "#808080" }
        }
    },
    "Default Dark": {
        "parent": "Default Light",
        "settings": {
            "surrounding_parens": { "foreground": "#dcdcdc", "background": "#3a3a3a" }
        }
    },
    "Tomorrow Night": {
        "parent": "Default Dark",
        "settings": {
            "surrounding_parens": { "foreground": "#8abeb7" }
        }
    }
}"##;

#[derive(Debug, Parser)]
#[command(name = "indent-guide-tui", version, about = "Terminal editor with an indent guide")]
struct Cli {
    /// File to open (created on save if missing)
    file: PathBuf,

    /// Syntax theme the guide color is taken from
    #[arg(long, default_value = DEFAULT_THEME)]
    theme: String,

    /// Extra themes (JSON object of theme name -> definition)
    #[arg(long, value_name = "PATH")]
    themes: Option<PathBuf>,

    /// Guide configuration (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Never scan into the last line of the document when looking for a block's end
    #[arg(long)]
    legacy_scan: bool,
}

struct App {
    editor: Editor,
    guide: IndentGuide<Editor>,
    file_path: PathBuf,
    should_quit: bool,
    status_message: String,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let content = if cli.file.exists() {
            fs::read_to_string(&cli.file)
                .with_context(|| format!("reading {}", cli.file.display()))?
        } else {
            String::new()
        };

        let mut themes = ThemeRegistry::from_json(BUILTIN_THEMES)?;
        if let Some(path) = &cli.themes {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading themes {}", path.display()))?;
            themes.extend_from_json(&json)?;
        }

        let mut config = match &cli.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                GuideConfig::from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => GuideConfig::default(),
        };
        if cli.legacy_scan {
            config.scan_boundary = GuideConfig::legacy().scan_boundary;
        }

        let status_message = if themes.contains(&cli.theme) {
            String::new()
        } else {
            format!("unknown theme '{}', using fallback color", cli.theme)
        };

        Ok(Self {
            editor: Editor::new(&content, themes, cli.theme.clone()),
            guide: IndentGuide::new(config),
            file_path: cli.file.clone(),
            should_quit: false,
            status_message,
        })
    }

    fn resize(&mut self, height: u16) {
        // Last row is the status line.
        self.editor.set_view_rows(height.saturating_sub(1) as usize);
    }

    /// Forward the events implied by the change from `before` to the current view state.
    fn sync_guide(&mut self, before: ViewState) {
        let after = self.editor.view_state();
        let mut events = Vec::new();
        if after.version != before.version {
            events.push(GuideEvent::ContentChanged);
        }
        if after.cursor_row != before.cursor_row {
            events.push(GuideEvent::CursorMoved);
        }
        if after.scroll_top != before.scroll_top {
            events.push(GuideEvent::Scrolled);
        }
        self.guide.handle_batch(events, &mut self.editor);
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let before = self.editor.view_state();

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('x')) => self.should_quit = true,
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.save(),
            (_, KeyCode::Left) => self.editor.move_left(),
            (_, KeyCode::Right) => self.editor.move_right(),
            (_, KeyCode::Up) => self.editor.move_vertical(-1),
            (_, KeyCode::Down) => self.editor.move_vertical(1),
            (_, KeyCode::Home) => self.editor.move_home(),
            (_, KeyCode::End) => self.editor.move_end(),
            (_, KeyCode::PageUp) => self.editor.page(-1),
            (_, KeyCode::PageDown) => self.editor.page(1),
            (_, KeyCode::Enter) => self.editor.insert_newline(),
            (_, KeyCode::Tab) => self.editor.insert_tab(),
            (_, KeyCode::Backspace) => self.editor.backspace(),
            (_, KeyCode::Delete) => self.editor.delete_forward(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(ch)) => {
                self.editor.insert_char(ch)
            }
            _ => {}
        }

        self.sync_guide(before);
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let before = self.editor.view_state();
        match mouse.kind {
            MouseEventKind::ScrollUp => self.editor.scroll_by(-3),
            MouseEventKind::ScrollDown => self.editor.scroll_by(3),
            _ => return,
        }
        self.sync_guide(before);
    }

    fn save(&mut self) {
        match fs::write(&self.file_path, self.editor.text()) {
            Ok(()) => {
                self.editor.mark_saved();
                self.status_message = format!("saved {}", self.file_path.display());
            }
            Err(err) => {
                tracing::error!(%err, path = %self.file_path.display(), "save failed");
                self.status_message = format!("save failed: {}", err);
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.area());

        self.render_text(frame, chunks[0]);
        self.render_guide(frame, chunks[0]);
        self.render_status(frame, chunks[1]);
    }

    fn render_text(&self, frame: &mut Frame, area: Rect) {
        let top = self.editor.scroll_top();
        let lines: Vec<Line> = self
            .editor
            .lines()
            .iter()
            .skip(top)
            .take(self.editor.view_rows().min(area.height as usize))
            .map(|line| Line::raw(line.as_str()))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);

        let (row, col) = self.editor.cursor();
        if row >= top && row < top + area.height as usize {
            let x = area.x + self.editor.display_x(row, col) as u16;
            let y = area.y + (row - top) as u16;
            if x < area.right() {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }

    fn render_guide(&self, frame: &mut Frame, area: Rect) {
        let Some(overlay) = self.editor.overlay() else {
            return;
        };
        let color = Color::Rgb(overlay.color.r, overlay.color.g, overlay.color.b);
        let x = area.x + overlay.column();
        if x >= area.right() {
            return;
        }

        let buffer = frame.buffer_mut();
        for row in overlay.rows() {
            if row >= area.height {
                break;
            }
            if let Some(cell) = buffer.cell_mut(Position::new(x, area.y + row))
                && cell.symbol() == " "
            {
                cell.set_symbol(GUIDE_SYMBOL).set_fg(color);
            }
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (row, col) = self.editor.cursor();
        let guide = match self.guide.last_placement() {
            Placement::Drawn { range, .. } => format!("block {}-{}", range.start, range.end),
            Placement::Hidden { range } => format!("block {}-{} (off-screen)", range.start, range.end),
            Placement::NotIndented => "top level".to_string(),
            other => format!("{:?}", other),
        };
        let modified = if self.editor.is_modified() { " [+]" } else { "" };
        let status = format!(
            " {}{}  Ln {}/{}, Col {}  |  {}  |  {}  {}",
            self.file_path.display(),
            modified,
            row + 1,
            self.editor.line_count(),
            col + 1,
            guide,
            self.editor.theme_name(),
            self.status_message,
        );

        frame.render_widget(
            Paragraph::new(status).style(Style::default().bg(Color::Blue).fg(Color::White)),
            area,
        );
    }
}

fn init_logging() -> Result<()> {
    let Some(path) = env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let path = PathBuf::from(path);
    let file =
        File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("indent_guide=debug,indent_guide_tui=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut app = App::new(&cli)?;
    tracing::info!(file = %cli.file.display(), theme = %cli.theme, "starting editor");

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    app.resize(terminal.size()?.height);
    app.guide.on_focus_gained(&mut app.editor);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                Event::FocusGained => app.guide.on_focus_gained(&mut app.editor),
                Event::FocusLost => app.guide.on_focus_lost(&mut app.editor),
                Event::Resize(_, height) => {
                    let before = app.editor.view_state();
                    app.resize(height);
                    app.sync_guide(before);
                    // Row count changed even if scroll_top did not.
                    app.guide.on_scrolled(&mut app.editor);
                }
                _ => {}
            }
        }
    }

    Ok(())
}
