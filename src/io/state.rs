use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::io::store::{Store, StoreError};
use crate::model::state::{AppState, STATE_VERSION};
use crate::model::task::{ListType, Task};

/// Store key holding the serialized [`AppState`]
pub const STATE_KEY: &str = "state";

/// Read the app state from the store.
///
/// Anything short of a readable state (store error, absent key, undecodable
/// value) yields a fresh default state. Never fails.
pub fn load_state(store: &dyn Store, now: DateTime<Utc>) -> AppState {
    let value = match store.get(STATE_KEY) {
        Ok(Some(v)) => v,
        Ok(None) => {
            tracing::info!("no saved state, starting fresh");
            return AppState::new(now);
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved state, starting fresh");
            return AppState::new(now);
        }
    };

    let mut state: AppState = match serde_json::from_value(value) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "saved state is unreadable, starting fresh");
            return AppState::new(now);
        }
    };

    if state.version != STATE_VERSION {
        tracing::warn!(
            found = state.version,
            expected = STATE_VERSION,
            "saved state has a different version, loading as-is"
        );
    }

    for list in ListType::ALL {
        dedupe_ids(state.lists.get_mut(list), list);
    }
    state
}

/// Write the app state to the store.
pub fn save_state(store: &mut dyn Store, state: &AppState) -> Result<(), StoreError> {
    let value = serde_json::to_value(state)?;
    store.set(STATE_KEY, value)
}

/// Keep the first task for each id.
fn dedupe_ids(tasks: &mut Vec<Task>, list: ListType) {
    let mut seen = HashSet::new();
    tasks.retain(|t| {
        let fresh = seen.insert(t.id.clone());
        if !fresh {
            tracing::warn!(%list, id = %t.id, "dropping task with duplicate id");
        }
        fresh
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::{FileStore, MemoryStore};
    use crate::model::state::ThemePreference;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn sample_state() -> AppState {
        let mut state = AppState::new(ts("2025-05-13T06:00:00Z"));
        state.theme = ThemePreference::Dark;
        state.lists.daily = vec![
            Task {
                id: "d1".into(),
                text: "Stretch".into(),
                checked: true,
                created_at: ts("2025-05-12T07:30:00Z"),
                order: 0,
                is_recurring: true,
            },
            Task {
                id: "d2".into(),
                text: "Call the bank".into(),
                checked: false,
                created_at: ts("2025-05-13T09:15:00Z"),
                order: 1,
                is_recurring: false,
            },
        ];
        state.lists.weekly = vec![Task {
            id: "w1".into(),
            text: "Plan the sprint".into(),
            checked: false,
            created_at: ts("2025-05-12T10:00:00Z"),
            order: 0,
            is_recurring: false,
        }];
        state
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = sample_state();

        let mut store = FileStore::open(dir.path(), 0);
        save_state(&mut store, &state).unwrap();

        let reopened = FileStore::open(dir.path(), 0);
        let loaded = load_state(&reopened, ts("2025-05-14T06:00:00Z"));
        assert_eq!(loaded, state);
    }

    #[test]
    fn absent_state_gives_defaults() {
        let store = MemoryStore::new();
        let now = ts("2025-05-14T06:00:00Z");
        assert_eq!(load_state(&store, now), AppState::new(now));
    }

    #[test]
    fn undecodable_state_gives_defaults() {
        let mut store = MemoryStore::new();
        store.set(STATE_KEY, json!({"lists": 42})).unwrap();
        let now = ts("2025-05-14T06:00:00Z");
        assert_eq!(load_state(&store, now), AppState::new(now));
    }

    #[test]
    fn corrupt_store_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(FileStore::FILE_NAME), "{{{").unwrap();
        let store = FileStore::open(dir.path(), 0);
        let now = ts("2025-05-14T06:00:00Z");
        assert_eq!(load_state(&store, now), AppState::new(now));
    }

    #[test]
    fn duplicate_ids_are_dropped_on_load() {
        let mut store = MemoryStore::new();
        store
            .set(
                STATE_KEY,
                json!({
                    "version": 1,
                    "lists": {
                        "daily": [
                            {"id": "a", "text": "first", "createdAt": "2025-05-13T06:00:00Z", "order": 0},
                            {"id": "a", "text": "copy", "createdAt": "2025-05-13T06:00:00Z", "order": 1},
                            {"id": "b", "text": "other", "createdAt": "2025-05-13T06:00:00Z", "order": 2}
                        ]
                    },
                    "lastReset": "2025-05-13T06:00:00Z"
                }),
            )
            .unwrap();
        let state = load_state(&store, ts("2025-05-14T06:00:00Z"));
        let texts: Vec<&str> = state.lists.daily.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "other"]);
        assert!(state.lists.weekly.is_empty());
        assert_eq!(state.theme, ThemePreference::System);
    }

    #[test]
    fn other_versions_load_as_is() {
        let mut store = MemoryStore::new();
        let mut state = sample_state();
        state.version = 2;
        save_state(&mut store, &state).unwrap();
        let loaded = load_state(&store, ts("2025-05-14T06:00:00Z"));
        assert_eq!(loaded.version, 2);
        assert_eq!(loaded.lists, state.lists);
    }
}
