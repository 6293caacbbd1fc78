use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

const NAVIGATE_HINTS: &str = "a add  e edit  space done  r repeat  d delete  J/K move  t theme  ? help  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.palette.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Add | Mode::Edit => {
            let prompt = if app.mode == Mode::Add { "add: " } else { "edit: " };
            let (before, after) = app.input.text.split_at(app.input.cursor.min(app.input.text.len()));
            let mut spans = vec![
                Span::styled(prompt, Style::default().fg(app.palette.dim).bg(bg)),
                Span::styled(before.to_string(), Style::default().fg(app.palette.text_bright).bg(bg)),
                Span::styled("\u{258C}", Style::default().fg(app.palette.highlight).bg(bg)), // ▌ cursor
                Span::styled(after.to_string(), Style::default().fg(app.palette.text_bright).bg(bg)),
            ];
            let hint = "Enter save  Esc cancel";
            let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
            let hint_width = unicode::display_width(hint);
            if content_width + hint_width < width {
                let padding = width - content_width - hint_width;
                spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
                spans.push(Span::styled(hint, Style::default().fg(app.palette.dim).bg(bg)));
            }
            Line::from(spans)
        }
        Mode::Navigate | Mode::Help => match &app.status {
            Some(message) => {
                let color = if message.is_error {
                    app.palette.error
                } else {
                    app.palette.text
                };
                Line::from(Span::styled(
                    unicode::truncate_to_width(&message.text, width),
                    Style::default().fg(color).bg(bg),
                ))
            }
            None if app.show_key_hints => Line::from(Span::styled(
                unicode::truncate_to_width(NAVIGATE_HINTS, width),
                Style::default().fg(app.palette.dim).bg(bg),
            )),
            None => Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg))),
        },
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
