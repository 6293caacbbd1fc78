use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{ListType, Task};

/// Version of the persisted state layout
pub const STATE_VERSION: u32 = 1;

/// Stored theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }

    /// system → light → dark → system
    pub fn next(self) -> ThemePreference {
        match self {
            ThemePreference::System => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::System,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" | "auto" => Ok(ThemePreference::System),
            other => Err(format!(
                "unknown theme '{}' (expected light, dark, or system)",
                other
            )),
        }
    }
}

/// The two task lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLists {
    #[serde(default)]
    pub daily: Vec<Task>,
    #[serde(default)]
    pub weekly: Vec<Task>,
}

impl TaskLists {
    pub fn get(&self, list: ListType) -> &[Task] {
        match list {
            ListType::Daily => &self.daily,
            ListType::Weekly => &self.weekly,
        }
    }

    pub fn get_mut(&mut self, list: ListType) -> &mut Vec<Task> {
        match list {
            ListType::Daily => &mut self.daily,
            ListType::Weekly => &mut self.weekly,
        }
    }
}

/// The whole application state, persisted as one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub version: u32,
    #[serde(default)]
    pub lists: TaskLists,
    #[serde(default)]
    pub theme: ThemePreference,
    pub last_reset: DateTime<Utc>,
}

impl AppState {
    /// Fresh state: empty lists, system theme, reset considered done at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        AppState {
            version: STATE_VERSION,
            lists: TaskLists::default(),
            theme: ThemePreference::System,
            last_reset: now,
        }
    }

    pub fn list(&self, list: ListType) -> &[Task] {
        self.lists.get(list)
    }

    /// Tasks of a list in display order (`order` ascending, stable).
    pub fn sorted(&self, list: ListType) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self.lists.get(list).iter().collect();
        tasks.sort_by_key(|t| t.order);
        tasks
    }

    /// Apply every field present in `patch`.
    pub fn merge(&mut self, patch: StatePatch) {
        if let Some(daily) = patch.daily {
            self.lists.daily = daily;
        }
        if let Some(weekly) = patch.weekly {
            self.lists.weekly = weekly;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(last_reset) = patch.last_reset {
            self.last_reset = last_reset;
        }
    }
}

/// Top-level fields to merge into [`AppState`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub daily: Option<Vec<Task>>,
    pub weekly: Option<Vec<Task>>,
    pub theme: Option<ThemePreference>,
    pub last_reset: Option<DateTime<Utc>>,
}

impl StatePatch {
    /// Replace one list.
    pub fn list(list: ListType, tasks: Vec<Task>) -> Self {
        let mut patch = StatePatch::default();
        match list {
            ListType::Daily => patch.daily = Some(tasks),
            ListType::Weekly => patch.weekly = Some(tasks),
        }
        patch
    }

    pub fn theme(theme: ThemePreference) -> Self {
        StatePatch {
            theme: Some(theme),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn task(id: &str, order: i64) -> Task {
        Task {
            id: id.into(),
            text: id.to_uppercase(),
            checked: false,
            created_at: ts("2025-05-14T08:00:00Z"),
            order,
            is_recurring: false,
        }
    }

    #[test]
    fn default_state() {
        let now = ts("2025-05-14T08:00:00Z");
        let state = AppState::new(now);
        assert_eq!(state.version, STATE_VERSION);
        assert!(state.lists.daily.is_empty());
        assert!(state.lists.weekly.is_empty());
        assert_eq!(state.theme, ThemePreference::System);
        assert_eq!(state.last_reset, now);
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let mut state = AppState::new(ts("2025-05-14T08:00:00Z"));
        state.lists.weekly = vec![task("w", 0)];

        state.merge(StatePatch::list(ListType::Daily, vec![task("a", 0)]));
        assert_eq!(state.lists.daily.len(), 1);
        assert_eq!(state.lists.weekly[0].id, "w");
        assert_eq!(state.theme, ThemePreference::System);

        state.merge(StatePatch::theme(ThemePreference::Dark));
        assert_eq!(state.theme, ThemePreference::Dark);
        assert_eq!(state.lists.daily[0].id, "a");
    }

    #[test]
    fn sorted_uses_order_then_position() {
        let mut state = AppState::new(ts("2025-05-14T08:00:00Z"));
        state.lists.daily = vec![task("b", 1), task("a", 0), task("c", 1)];
        let ids: Vec<&str> = state
            .sorted(ListType::Daily)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn serialized_field_names() {
        let state = AppState::new(ts("2025-05-14T08:00:00Z"));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["theme"], "system");
        assert_eq!(json["lastReset"], "2025-05-14T08:00:00Z");
        assert!(json["lists"]["daily"].as_array().unwrap().is_empty());
    }

    #[test]
    fn theme_cycle_and_parse() {
        assert_eq!(ThemePreference::System.next(), ThemePreference::Light);
        assert_eq!(ThemePreference::Dark.next(), ThemePreference::System);
        assert_eq!("DARK".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
        assert_eq!("auto".parse::<ThemePreference>(), Ok(ThemePreference::System));
        assert!("sepia".parse::<ThemePreference>().is_err());
    }
}
