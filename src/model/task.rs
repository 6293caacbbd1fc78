use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum task text length, in characters, after trimming.
pub const MAX_TEXT_LEN: usize = 500;

/// Maximum number of tasks a single list may hold.
pub const MAX_TASKS_PER_LIST: usize = 100;

/// Which of the two task lists an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Daily,
    Weekly,
}

impl ListType {
    pub const ALL: [ListType; 2] = [ListType::Daily, ListType::Weekly];

    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Daily => "daily",
            ListType::Weekly => "weekly",
        }
    }

    /// Heading shown above the list in the dashboard
    pub fn title(self) -> &'static str {
        match self {
            ListType::Daily => "Today",
            ListType::Weekly => "This Week",
        }
    }

    pub fn other(self) -> ListType {
        match self {
            ListType::Daily => ListType::Weekly,
            ListType::Weekly => ListType::Daily,
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(ListType::Daily),
            "weekly" | "week" | "w" => Ok(ListType::Weekly),
            other => Err(format!("unknown list '{}' (expected daily or weekly)", other)),
        }
    }
}

/// A single task in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique id, immutable for the task's lifetime
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    pub created_at: DateTime<Utc>,
    /// Display rank within the list (0 = first)
    #[serde(default)]
    pub order: i64,
    /// Recurring tasks survive the daily reset with their check cleared
    #[serde(default)]
    pub is_recurring: bool,
}

impl Task {
    /// Create an unchecked, non-recurring task at rank 0 with a fresh id.
    pub fn new(text: String, created_at: DateTime<Utc>) -> Self {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            checked: false,
            created_at,
            order: 0,
            is_recurring: false,
        }
    }
}

/// Partial update for a task. `id` and `createdAt` are deliberately absent;
/// a JSON patch naming them fails to deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
}

impl TaskPatch {
    pub fn text(text: impl Into<String>) -> Self {
        TaskPatch {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn recurring(is_recurring: bool) -> Self {
        TaskPatch {
            is_recurring: Some(is_recurring),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.checked.is_none()
            && self.order.is_none()
            && self.is_recurring.is_none()
    }
}
