use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::task::{ListType, Task};
use crate::tui::app::App;
use crate::util::unicode;

const RECURRING_MARK: &str = " \u{21BB}"; // ↻

/// Render one task list inside a titled box
pub fn render_list(frame: &mut Frame, app: &App, list: ListType, area: Rect) {
    let palette = &app.palette;
    let bg = palette.background;
    let focused = app.focus == list;
    let tasks = app.visible(list);
    let done = tasks.iter().filter(|t| t.checked).count();

    let border = if focused { palette.highlight } else { palette.dim };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Span::styled(
            format!(" {} {}/{} ", list.title(), done, tasks.len()),
            Style::default()
                .fg(palette.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    let width = inner.width as usize;
    if height == 0 || width == 0 {
        return;
    }

    if tasks.is_empty() {
        let hint = if focused {
            " nothing yet, press a to add"
        } else {
            " nothing yet"
        };
        let line = Line::from(Span::styled(
            unicode::truncate_to_width(hint, width),
            Style::default().fg(palette.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line), inner);
        return;
    }

    // Scroll so the cursor row stays visible
    let cursor = app.cursor(list);
    let offset = (cursor + 1).saturating_sub(height);

    let lines: Vec<Line> = tasks
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, task)| task_line(app, task, focused && i == cursor, width))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn task_line<'a>(app: &App, task: &Task, selected: bool, width: usize) -> Line<'a> {
    let palette = &app.palette;
    let bg = if selected {
        palette.selection_bg
    } else {
        palette.background
    };

    let marker = if selected { "\u{25B8} " } else { "  " }; // ▸
    let checkbox = if task.checked { "[x] " } else { "[ ] " };
    let suffix = if task.is_recurring { RECURRING_MARK } else { "" };

    let fixed = unicode::display_width(marker)
        + unicode::display_width(checkbox)
        + unicode::display_width(suffix);
    let text = unicode::truncate_to_width(&task.text, width.saturating_sub(fixed));

    let mut text_style = Style::default().fg(palette.text).bg(bg);
    if task.checked {
        text_style = text_style
            .fg(palette.dim)
            .add_modifier(Modifier::CROSSED_OUT);
    } else if selected {
        text_style = text_style.fg(palette.text_bright);
    }

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(palette.highlight).bg(bg)),
        Span::styled(checkbox, Style::default().fg(palette.dim).bg(bg)),
        Span::styled(text, text_style),
    ];
    if !suffix.is_empty() {
        spans.push(Span::styled(suffix, Style::default().fg(palette.accent).bg(bg)));
    }
    Line::from(spans).style(Style::default().bg(bg))
}
