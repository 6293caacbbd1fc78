use crossterm::event::{KeyCode, KeyEvent};

use crate::model::task::TaskPatch;
use crate::tui::app::{App, InputLine, Mode};
use crate::util::unicode;

/// Keys for the one-line input row (adding or editing a task)
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => finish(app),
        KeyCode::Enter => commit(app),
        KeyCode::Char(c) => {
            app.input.text.insert(app.input.cursor, c);
            app.input.cursor += c.len_utf8();
        }
        KeyCode::Backspace => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.input.text, app.input.cursor) {
                app.input.text.replace_range(prev..app.input.cursor, "");
                app.input.cursor = prev;
            }
        }
        KeyCode::Delete => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.input.text, app.input.cursor) {
                app.input.text.replace_range(app.input.cursor..next, "");
            }
        }
        KeyCode::Left => {
            if let Some(prev) = unicode::prev_grapheme_boundary(&app.input.text, app.input.cursor) {
                app.input.cursor = prev;
            }
        }
        KeyCode::Right => {
            if let Some(next) = unicode::next_grapheme_boundary(&app.input.text, app.input.cursor) {
                app.input.cursor = next;
            }
        }
        KeyCode::Home => app.input.cursor = 0,
        KeyCode::End => app.input.cursor = app.input.text.len(),
        _ => {}
    }
}

/// Leave the input row without saving
fn finish(app: &mut App) {
    app.mode = Mode::Navigate;
    app.input = InputLine::default();
    app.editing_id = None;
}

/// Validation errors keep the input row open so the text can be fixed.
fn commit(app: &mut App) {
    let text = app.input.text.clone();
    let result = match (app.mode, app.editing_id.clone()) {
        (Mode::Edit, Some(id)) => app
            .ctx
            .update(app.focus, &id, &TaskPatch::text(text))
            .map(|()| id),
        _ => app.ctx.add(app.focus, &text),
    };
    match result {
        Ok(id) => {
            finish(app);
            app.follow(&id);
        }
        Err(e) => app.error(&e),
    }
}
