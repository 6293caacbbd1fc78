pub mod header;
pub mod help_overlay;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::model::task::ListType;

use super::app::{App, Mode};

/// Below this width the two lists are stacked instead of side by side
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 70;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.palette.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (1 row) | lists | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    let [daily_area, weekly_area] = list_areas(chunks[1]);
    list_view::render_list(frame, app, ListType::Daily, daily_area);
    list_view::render_list(frame, app, ListType::Weekly, weekly_area);

    if app.mode == Mode::Help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

fn list_areas(area: Rect) -> [Rect; 2] {
    let direction = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let chunks = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    [chunks[0], chunks[1]]
}
