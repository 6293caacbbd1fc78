use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::{MemoryStore, Store};
use crate::model::config::UiConfig;
use crate::model::task::ListType;
use crate::ops::theme::FixedAppearance;
use crate::state::AppContext;
use crate::state::test_support::ManualClock;
use crate::tui::app::{App, TuiRenderer};

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An empty App over a memory store, with a fixed OS signal.
pub fn test_app(os_dark: bool) -> App {
    let clock = ManualClock::at("2025-05-14T08:00:00Z");
    let store: Box<dyn Store> = Box::new(MemoryStore::new());
    let ctx = AppContext::start(
        store,
        TuiRenderer::default(),
        Box::new(clock),
        Duration::from_millis(100),
    );
    App::new(ctx, Box::new(FixedAppearance(os_dark)), UiConfig::default())
}

/// An App (dark OS signal) whose lists show the given texts top to bottom.
pub fn app_with_tasks(daily: &[&str], weekly: &[&str]) -> App {
    let mut app = test_app(true);
    for (list, texts) in [(ListType::Daily, daily), (ListType::Weekly, weekly)] {
        // Adding puts each task on top, so add in reverse
        for text in texts.iter().rev() {
            app.ctx.add(list, text).unwrap();
        }
    }
    app
}

/// Task texts of `list` in display order
pub fn texts(app: &App, list: ListType) -> Vec<String> {
    app.visible(list).iter().map(|t| t.text.clone()).collect()
}
