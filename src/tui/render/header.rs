use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::state::ThemePreference;
use crate::tui::app::App;
use crate::util::unicode;

/// Title on the left, theme indicator on the right
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.palette.background;
    let width = area.width as usize;

    let title = " daylist";
    let indicator = theme_indicator(app.state().theme, &app.effective_theme.to_string());

    let mut spans = vec![Span::styled(
        title,
        Style::default()
            .fg(app.palette.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];
    let used = unicode::display_width(title) + unicode::display_width(&indicator);
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(Span::styled(
            indicator,
            Style::default().fg(app.palette.dim).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// "theme: system (dark) " or "theme: light "
fn theme_indicator(preference: ThemePreference, effective: &str) -> String {
    match preference {
        ThemePreference::System => format!("theme: system ({}) ", effective),
        explicit => format!("theme: {} ", explicit),
    }
}
