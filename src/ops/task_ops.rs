use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::model::task::{MAX_TASKS_PER_LIST, MAX_TEXT_LEN, Task, TaskPatch};

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("invalid task: {0}")]
    InvalidTask(String),
    #[error("list is full (max {} tasks)", MAX_TASKS_PER_LIST)]
    ListFull,
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("ambiguous task id '{0}' matches more than one task")]
    AmbiguousId(String),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Trim `text` and check it against the length bounds.
/// Returns the trimmed text.
pub fn validate_text(text: &str) -> Result<String, TaskError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(TaskError::InvalidTask("text is empty".into()));
    }
    if len > MAX_TEXT_LEN {
        return Err(TaskError::InvalidTask(format!(
            "text is {} characters (max {})",
            len, MAX_TEXT_LEN
        )));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Add a task as the most recent (rank 0); every existing task moves down one.
pub fn add_task(tasks: &[Task], text: &str, now: DateTime<Utc>) -> Result<Vec<Task>, TaskError> {
    let text = validate_text(text)?;
    if tasks.len() >= MAX_TASKS_PER_LIST {
        return Err(TaskError::ListFull);
    }

    let mut result = Vec::with_capacity(tasks.len() + 1);
    result.push(Task::new(text, now));
    result.extend(tasks.iter().cloned().map(|mut t| {
        t.order += 1;
        t
    }));
    Ok(result)
}

/// Merge `patch` into the task with `id`. Text is re-validated.
pub fn update_task(tasks: &[Task], id: &str, patch: &TaskPatch) -> Result<Vec<Task>, TaskError> {
    let idx = position(tasks, id)?;
    let text = patch.text.as_deref().map(validate_text).transpose()?;

    let mut result = tasks.to_vec();
    let task = &mut result[idx];
    if let Some(text) = text {
        task.text = text;
    }
    if let Some(checked) = patch.checked {
        task.checked = checked;
    }
    if let Some(order) = patch.order {
        task.order = order;
    }
    if let Some(is_recurring) = patch.is_recurring {
        task.is_recurring = is_recurring;
    }
    Ok(result)
}

/// Remove the task with `id`. Absent ids are not an error.
pub fn delete_task(tasks: &[Task], id: &str) -> Vec<Task> {
    tasks.iter().filter(|t| t.id != id).cloned().collect()
}

/// Flip `checked`, then regroup the list so completed tasks sort last.
pub fn toggle_task(tasks: &[Task], id: &str) -> Result<Vec<Task>, TaskError> {
    let idx = position(tasks, id)?;
    let mut result = tasks.to_vec();
    result[idx].checked = !result[idx].checked;
    Ok(sort_by_completion(result))
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Uncompleted tasks first, completed after, each group keeping its
/// relative `order`. Ranks are renumbered 0..n-1.
pub fn sort_by_completion(tasks: Vec<Task>) -> Vec<Task> {
    let (mut open, mut done): (Vec<Task>, Vec<Task>) = tasks.into_iter().partition(|t| !t.checked);
    open.sort_by_key(|t| t.order);
    done.sort_by_key(|t| t.order);
    open.extend(done);
    renumber(&mut open);
    open
}

/// Rebuild the list in the sequence given by `ordered_ids`, with
/// `order = index`. Tasks whose id is not named are dropped; unknown and
/// repeated ids are skipped. Callers pass the full id set.
pub fn reorder_tasks<S: AsRef<str>>(tasks: &[Task], ordered_ids: &[S]) -> Vec<Task> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = Vec::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        let id: &str = id.as_ref();
        if !seen.insert(id) {
            continue;
        }
        if let Some(task) = find_task(tasks, id) {
            result.push(task.clone());
        }
    }
    renumber(&mut result);
    result
}

/// Move a task `delta` places in display order (negative = up), clamped to
/// the list bounds. This is the keyboard form of drag-reorder.
pub fn move_task(tasks: &[Task], id: &str, delta: i64) -> Result<Vec<Task>, TaskError> {
    let mut ids: Vec<&str> = display_order(tasks)
        .into_iter()
        .map(|t| t.id.as_str())
        .collect();
    let from = ids
        .iter()
        .position(|t| *t == id)
        .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))?;
    let last = ids.len() as i64 - 1;
    let to = (from as i64).saturating_add(delta).clamp(0, last) as usize;

    let moved = ids.remove(from);
    ids.insert(to, moved);
    Ok(reorder_tasks(tasks, &ids))
}

/// Assign `order = index` for every task.
pub fn renumber(tasks: &mut [Task]) {
    for (i, task) in tasks.iter_mut().enumerate() {
        task.order = i as i64;
    }
}

/// Tasks sorted by `order`, ties kept in input position.
pub fn display_order(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|t| t.order);
    sorted
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

fn position(tasks: &[Task], id: &str) -> Result<usize, TaskError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TaskError::TaskNotFound(id.to_string()))
}

/// Expand a (possibly abbreviated) id to the full id of exactly one task.
/// An exact match always wins over prefix matches.
pub fn resolve_id(tasks: &[Task], id_or_prefix: &str) -> Result<String, TaskError> {
    if let Some(task) = find_task(tasks, id_or_prefix) {
        return Ok(task.id.clone());
    }
    if id_or_prefix.is_empty() {
        return Err(TaskError::TaskNotFound(String::new()));
    }
    let mut matches = tasks.iter().filter(|t| t.id.starts_with(id_or_prefix));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id.clone()),
        (Some(_), Some(_)) => Err(TaskError::AmbiguousId(id_or_prefix.to_string())),
        (None, _) => Err(TaskError::TaskNotFound(id_or_prefix.to_string())),
    }
}
