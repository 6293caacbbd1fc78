use crossterm::event::{KeyCode, KeyEvent};

use crate::model::task::{ListType, TaskPatch};
use crate::tui::app::{App, InputLine, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.other(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.set_cursor(app.focus, app.cursor(app.focus) + 1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.set_cursor(app.focus, app.cursor(app.focus).saturating_sub(1));
        }
        KeyCode::Char('g') | KeyCode::Home => app.set_cursor(app.focus, 0),
        KeyCode::Char('G') | KeyCode::End => app.set_cursor(app.focus, usize::MAX),
        KeyCode::Char('a') => {
            app.input = InputLine::default();
            app.mode = Mode::Add;
        }
        KeyCode::Char('e') | KeyCode::Enter => begin_edit(app),
        KeyCode::Char(' ') | KeyCode::Char('x') => toggle_selected(app),
        KeyCode::Char('r') => toggle_recurring(app),
        KeyCode::Char('d') => delete_selected(app),
        KeyCode::Char('J') => move_selected(app, 1),
        KeyCode::Char('K') => move_selected(app, -1),
        KeyCode::Char('t') => {
            let next = app.state().theme.next();
            app.ctx.set_theme(next);
            app.refresh_theme();
            app.info(format!("theme: {} ({})", next, app.effective_theme));
        }
        KeyCode::Char('?') => app.mode = Mode::Help,
        _ => {}
    }
}

fn selected_id(app: &App) -> Option<String> {
    app.selected().map(|t| t.id.clone())
}

fn begin_edit(app: &mut App) {
    let Some(task) = app.selected() else {
        return;
    };
    let (id, input) = (task.id.clone(), InputLine::with_text(&task.text));
    app.editing_id = Some(id);
    app.input = input;
    app.mode = Mode::Edit;
}

fn toggle_selected(app: &mut App) {
    let Some(id) = selected_id(app) else {
        return;
    };
    match app.ctx.toggle(app.focus, &id) {
        Ok(_) => app.follow(&id),
        Err(e) => app.error(&e),
    }
}

fn toggle_recurring(app: &mut App) {
    if app.focus != ListType::Daily {
        app.info("only daily tasks can recur");
        return;
    }
    let Some(task) = app.selected() else {
        return;
    };
    let (id, recurring) = (task.id.clone(), !task.is_recurring);
    match app.ctx.update(app.focus, &id, &TaskPatch::recurring(recurring)) {
        Ok(()) if recurring => app.info("repeats every day"),
        Ok(()) => app.info("no longer repeats"),
        Err(e) => app.error(&e),
    }
}

fn delete_selected(app: &mut App) {
    if let Some(id) = selected_id(app) {
        app.ctx.delete(app.focus, &id);
    }
}

fn move_selected(app: &mut App, delta: i64) {
    let Some(id) = selected_id(app) else {
        return;
    };
    match app.ctx.move_task(app.focus, &id, delta) {
        Ok(()) => app.follow(&id),
        Err(e) => app.error(&e),
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    use crate::model::state::ThemePreference;
    use crate::model::task::ListType;
    use crate::tui::app::Mode;
    use crate::tui::input::press;
    use crate::tui::render::test_helpers::{app_with_tasks, texts};

    #[test]
    fn tab_switches_focus() {
        let mut app = app_with_tasks(&["a"], &["b"]);
        assert_eq!(app.focus, ListType::Daily);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, ListType::Weekly);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, ListType::Daily);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = app_with_tasks(&["a", "b"], &[]);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.daily_cursor, 0);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.daily_cursor, 1);
    }

    #[test]
    fn toggle_moves_task_down_and_cursor_follows() {
        let mut app = app_with_tasks(&["a", "b", "c"], &[]);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(texts(&app, ListType::Daily), vec!["b", "c", "a"]);
        assert_eq!(app.daily_cursor, 2);
        assert!(app.selected().unwrap().checked);
    }

    #[test]
    fn recurring_only_on_daily() {
        let mut app = app_with_tasks(&["habit"], &["chore"]);
        press(&mut app, KeyCode::Char('r'));
        assert!(app.state().lists.daily[0].is_recurring);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('r'));
        assert!(!app.state().lists.weekly[0].is_recurring);
        assert!(app.status.is_some());
    }

    #[test]
    fn delete_removes_selected() {
        let mut app = app_with_tasks(&["a", "b"], &[]);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(texts(&app, ListType::Daily), vec!["a"]);
        assert_eq!(app.daily_cursor, 0);
    }

    #[test]
    fn shift_j_and_k_move_task() {
        let mut app = app_with_tasks(&["a", "b", "c"], &[]);
        press(&mut app, KeyCode::Char('J'));
        assert_eq!(texts(&app, ListType::Daily), vec!["b", "a", "c"]);
        assert_eq!(app.daily_cursor, 1);
        press(&mut app, KeyCode::Char('K'));
        assert_eq!(texts(&app, ListType::Daily), vec!["a", "b", "c"]);
    }

    #[test]
    fn t_cycles_theme_preference() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.state().theme, ThemePreference::Light);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.state().theme, ThemePreference::Dark);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.state().theme, ThemePreference::System);
    }

    #[test]
    fn help_closes_on_any_key() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.mode, Mode::Navigate);
        assert!(!app.should_quit);
    }

    #[test]
    fn q_quits() {
        let mut app = app_with_tasks(&[], &[]);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
