use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::state::{AppState, ThemePreference};
use crate::model::task::{ListType, Task};
use crate::ops::reset::ResetOutcome;
use crate::ops::theme::EffectiveTheme;

/// Length of the id shown in human output
pub const SHORT_ID_LEN: usize = 8;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskListJson<'a> {
    pub list: ListType,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub preference: ThemePreference,
    pub effective: EffectiveTheme,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetJson {
    pub kept: usize,
    pub dropped: usize,
    pub last_reset: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReorderJson<'a> {
    pub list: ListType,
    pub tasks: Vec<&'a Task>,
    /// Tasks removed because they were not named
    pub dropped: usize,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn list_to_json(state: &AppState, list: ListType) -> TaskListJson<'_> {
    TaskListJson {
        list,
        tasks: state.sorted(list),
    }
}

pub fn reset_to_json(outcome: &ResetOutcome) -> ResetJson {
    ResetJson {
        kept: outcome.daily.len(),
        dropped: outcome.dropped,
        last_reset: outcome.last_reset,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// `1f0c2a9b  [x] Water plants  (recurring)`
pub fn format_task_line(task: &Task) -> String {
    let check = if task.checked { 'x' } else { ' ' };
    let mut line = format!("{}  [{}] {}", short_id(&task.id), check, task.text);
    if task.is_recurring {
        line.push_str("  (recurring)");
    }
    line
}

/// A titled list block; empty lists say so.
pub fn format_list(state: &AppState, list: ListType) -> Vec<String> {
    let tasks = state.sorted(list);
    let done = tasks.iter().filter(|t| t.checked).count();
    let mut lines = vec![format!("{} ({}/{})", list.title(), done, tasks.len())];
    if tasks.is_empty() {
        lines.push("  (empty)".to_string());
    }
    for task in tasks {
        lines.push(format!("  {}", format_task_line(task)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-05-14T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn task(id: &str, text: &str, checked: bool, recurring: bool) -> Task {
        let mut t = Task::new(text.to_string(), ts());
        t.id = id.to_string();
        t.checked = checked;
        t.is_recurring = recurring;
        t
    }

    #[test]
    fn task_line_shows_short_id_and_flags() {
        let t = task("1f0c2a9b-0000-4000-8000-000000000000", "Water plants", true, true);
        assert_eq!(format_task_line(&t), "1f0c2a9b  [x] Water plants  (recurring)");
        let t = task("abc", "Short id", false, false);
        assert_eq!(format_task_line(&t), "abc  [ ] Short id");
    }

    #[test]
    fn list_block_counts_done() {
        let mut state = AppState::new(ts());
        let mut a = task("aaaaaaaa-1", "First", false, false);
        a.order = 0;
        let mut b = task("bbbbbbbb-2", "Second", true, false);
        b.order = 1;
        state.lists.weekly = vec![b, a];

        assert_eq!(
            format_list(&state, ListType::Weekly),
            vec![
                "This Week (1/2)".to_string(),
                "  aaaaaaaa  [ ] First".to_string(),
                "  bbbbbbbb  [x] Second".to_string(),
            ]
        );
        assert_eq!(
            format_list(&state, ListType::Daily),
            vec!["Today (0/0)".to_string(), "  (empty)".to_string()]
        );
    }

    #[test]
    fn list_json_is_in_display_order() {
        let mut state = AppState::new(ts());
        let mut a = task("a", "A", false, false);
        a.order = 1;
        let mut b = task("b", "B", false, false);
        b.order = 0;
        state.lists.daily = vec![a, b];
        let json = serde_json::to_value(list_to_json(&state, ListType::Daily)).unwrap();
        assert_eq!(json["list"], "daily");
        assert_eq!(json["tasks"][0]["id"], "b");
        assert_eq!(json["tasks"][1]["text"], "A");
    }
}
