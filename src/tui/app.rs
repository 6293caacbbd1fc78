use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::store::{FileStore, Store};
use crate::model::config::{Config, UiConfig};
use crate::model::state::AppState;
use crate::model::task::{ListType, Task};
use crate::ops::theme::{self, Appearance, EffectiveTheme, TerminalAppearance};
use crate::state::{AppContext, AppError, Renderer, SystemClock};

use super::input;
use super::render;
use super::theme::Palette;

/// Longest the loop sleeps when no write is queued
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a new task into the input row
    Add,
    /// Editing the selected task's text
    Edit,
    Help,
}

/// One-line text input with a grapheme-aware cursor (byte offset)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    pub text: String,
    pub cursor: usize,
}

impl InputLine {
    pub fn with_text(text: &str) -> Self {
        InputLine {
            text: text.to_string(),
            cursor: text.len(),
        }
    }
}

/// Message shown in the status row until the next key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Drawing happens in the event loop; the renderer only records that the
/// state changed and keeps errors for the status row.
#[derive(Debug, Default)]
pub struct TuiRenderer {
    pub dirty: bool,
    pub errors: Vec<String>,
}

impl Renderer for TuiRenderer {
    fn render(&mut self, _state: &AppState) {
        self.dirty = true;
    }

    fn report_error(&mut self, error: &AppError) {
        self.errors.push(error.to_string());
    }
}

/// Main application state
pub struct App {
    pub ctx: AppContext<Box<dyn Store>, TuiRenderer>,
    pub focus: ListType,
    pub daily_cursor: usize,
    pub weekly_cursor: usize,
    pub mode: Mode,
    pub input: InputLine,
    /// Task being edited in [`Mode::Edit`]
    pub editing_id: Option<String>,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    pub effective_theme: EffectiveTheme,
    pub palette: Palette,
    pub show_key_hints: bool,
    ui: UiConfig,
    appearance: Box<dyn Appearance>,
}

impl App {
    pub fn new(
        ctx: AppContext<Box<dyn Store>, TuiRenderer>,
        appearance: Box<dyn Appearance>,
        ui: UiConfig,
    ) -> Self {
        let effective_theme = theme::resolve(ctx.state().theme, appearance.prefers_dark());
        let palette = Palette::for_theme(effective_theme, &ui);
        let mut app = App {
            ctx,
            focus: ListType::Daily,
            daily_cursor: 0,
            weekly_cursor: 0,
            mode: Mode::Navigate,
            input: InputLine::default(),
            editing_id: None,
            status: None,
            should_quit: false,
            effective_theme,
            palette,
            show_key_hints: ui.show_key_hints,
            ui,
            appearance,
        };
        app.collect_errors();
        app
    }

    pub fn state(&self) -> &AppState {
        self.ctx.state()
    }

    pub fn cursor(&self, list: ListType) -> usize {
        match list {
            ListType::Daily => self.daily_cursor,
            ListType::Weekly => self.weekly_cursor,
        }
    }

    pub fn set_cursor(&mut self, list: ListType, cursor: usize) {
        let len = self.state().list(list).len();
        let cursor = cursor.min(len.saturating_sub(1));
        match list {
            ListType::Daily => self.daily_cursor = cursor,
            ListType::Weekly => self.weekly_cursor = cursor,
        }
    }

    /// Keep both cursors inside their lists after a change.
    pub fn clamp_cursors(&mut self) {
        for list in ListType::ALL {
            self.set_cursor(list, self.cursor(list));
        }
    }

    /// Tasks of `list` in display order
    pub fn visible(&self, list: ListType) -> Vec<&Task> {
        self.state().sorted(list)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.visible(self.focus)
            .get(self.cursor(self.focus))
            .copied()
    }

    /// Put the cursor on task `id` in the focused list, wherever it moved.
    pub fn follow(&mut self, id: &str) {
        let pos = self.visible(self.focus).iter().position(|t| t.id == id);
        if let Some(pos) = pos {
            self.set_cursor(self.focus, pos);
        }
    }

    /// Rebuild the palette if the effective theme changed.
    pub fn refresh_theme(&mut self) {
        let effective = theme::resolve(self.state().theme, self.appearance.prefers_dark());
        if effective != self.effective_theme {
            tracing::debug!(theme = %effective, "effective theme changed");
            self.effective_theme = effective;
            self.palette = Palette::for_theme(effective, &self.ui);
            self.ctx.renderer_mut().dirty = true;
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error: false,
        });
    }

    pub fn error(&mut self, error: &AppError) {
        self.status = Some(StatusMessage {
            text: error.to_string(),
            is_error: true,
        });
    }

    /// Move storage errors the renderer collected into the status row.
    pub fn collect_errors(&mut self) {
        if let Some(last) = self.ctx.renderer_mut().errors.drain(..).last() {
            self.status = Some(StatusMessage {
                text: last,
                is_error: true,
            });
            self.ctx.renderer_mut().dirty = true;
        }
    }

    /// Handle the queued write and any errors it produced.
    pub fn tick(&mut self, now: Instant) {
        self.ctx.tick(now);
        self.collect_errors();
        self.refresh_theme();
    }

    /// How long the event loop may block waiting for input
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.ctx
            .time_until_write(now)
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL))
    }
}

/// Run the TUI application
pub fn run(config: &Config, data_dir: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let store: Box<dyn Store> = Box::new(FileStore::open(data_dir, config.storage.quota_bytes));
    let ctx = AppContext::start(
        store,
        TuiRenderer::default(),
        Box::new(SystemClock),
        Duration::from_millis(config.storage.debounce_ms),
    );
    let appearance = TerminalAppearance::new(config.ui.system_theme.as_deref());
    let mut app = App::new(ctx, Box::new(appearance), config.ui.clone());
    tracing::info!(data_dir = %data_dir.display(), "tui started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // A write still inside its debounce window is dropped
    app.ctx.shutdown();
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut redraw = true;
    loop {
        if redraw || app.ctx.renderer().dirty {
            terminal.draw(|frame| render::render(frame, app))?;
            app.ctx.renderer_mut().dirty = false;
        }

        redraw = false;
        if event::poll(app.poll_timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    redraw = true;
                }
                Event::Resize(..) => redraw = true,
                _ => {}
            }
        }

        app.tick(Instant::now());
        if app.should_quit {
            break;
        }
    }
    Ok(())
}
