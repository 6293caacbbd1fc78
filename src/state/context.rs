use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::io::state::{load_state, save_state};
use crate::io::store::{Store, StoreError};
use crate::model::state::{AppState, StatePatch, ThemePreference};
use crate::model::task::{ListType, TaskPatch};
use crate::ops::reset::{self, ResetOutcome};
use crate::ops::task_ops::{self, TaskError};

use super::{Clock, Renderer, StateContainer};

/// Errors surfaced to the user. All are recoverable: the in-memory state
/// stays consistent whatever happens.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("storage failure: {0}")]
    StorageFailure(#[from] StoreError),
}

/// The application: state container, store, renderer and clock, built once
/// and passed by reference to whatever drives it (TUI loop or CLI command).
pub struct AppContext<S: Store, R: Renderer> {
    container: StateContainer,
    store: S,
    renderer: R,
    clock: Box<dyn Clock>,
}

impl<S: Store, R: Renderer> AppContext<S, R> {
    /// Load the saved state, run the once-per-day reset check, and render.
    pub fn start(store: S, mut renderer: R, clock: Box<dyn Clock>, debounce: Duration) -> Self {
        let state = load_state(&store, clock.now());
        let container = StateContainer::new(state, debounce);
        renderer.render(container.read());

        let mut ctx = AppContext {
            container,
            store,
            renderer,
            clock,
        };
        ctx.check_reset();
        ctx
    }

    pub fn state(&self) -> &AppState {
        self.container.read()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn commit(&mut self, patch: StatePatch) {
        self.container
            .merge_update(patch, Instant::now(), &mut self.renderer);
    }

    // -----------------------------------------------------------------------
    // Task intents
    // -----------------------------------------------------------------------

    /// Add a task at the top of `list`. Returns the new task's id.
    pub fn add(&mut self, list: ListType, text: &str) -> Result<String, AppError> {
        let tasks = task_ops::add_task(self.state().list(list), text, self.clock.now())?;
        let id = tasks[0].id.clone();
        tracing::debug!(%list, %id, "task added");
        self.commit(StatePatch::list(list, tasks));
        Ok(id)
    }

    pub fn update(&mut self, list: ListType, id: &str, patch: &TaskPatch) -> Result<(), AppError> {
        let tasks = task_ops::update_task(self.state().list(list), id, patch)?;
        tracing::debug!(%list, %id, "task updated");
        self.commit(StatePatch::list(list, tasks));
        Ok(())
    }

    /// Remove a task. Returns whether anything was removed.
    pub fn delete(&mut self, list: ListType, id: &str) -> bool {
        let before = self.state().list(list).len();
        let tasks = task_ops::delete_task(self.state().list(list), id);
        let removed = tasks.len() != before;
        if removed {
            tracing::debug!(%list, %id, "task deleted");
        }
        self.commit(StatePatch::list(list, tasks));
        removed
    }

    /// Flip a task's checkbox. Returns the new checked state.
    pub fn toggle(&mut self, list: ListType, id: &str) -> Result<bool, AppError> {
        let tasks = task_ops::toggle_task(self.state().list(list), id)?;
        let checked = task_ops::find_task(&tasks, id).is_some_and(|t| t.checked);
        tracing::debug!(%list, %id, checked, "task toggled");
        self.commit(StatePatch::list(list, tasks));
        Ok(checked)
    }

    /// Reorder `list` to the given id sequence (callers pass every id).
    pub fn reorder<T: AsRef<str>>(&mut self, list: ListType, ordered_ids: &[T]) {
        let tasks = task_ops::reorder_tasks(self.state().list(list), ordered_ids);
        self.commit(StatePatch::list(list, tasks));
    }

    pub fn move_task(&mut self, list: ListType, id: &str, delta: i64) -> Result<(), AppError> {
        let tasks = task_ops::move_task(self.state().list(list), id, delta)?;
        self.commit(StatePatch::list(list, tasks));
        Ok(())
    }

    /// Expand an abbreviated id within `list`.
    pub fn resolve_id(&self, list: ListType, id_or_prefix: &str) -> Result<String, AppError> {
        Ok(task_ops::resolve_id(self.state().list(list), id_or_prefix)?)
    }

    // -----------------------------------------------------------------------
    // Theme, reset, clear
    // -----------------------------------------------------------------------

    pub fn set_theme(&mut self, preference: ThemePreference) {
        tracing::debug!(theme = %preference, "theme preference changed");
        self.commit(StatePatch::theme(preference));
    }

    /// Reset the daily list if the calendar day changed since the last
    /// reset. Returns whether a reset ran.
    pub fn check_reset(&mut self) -> bool {
        let now = self.clock.now();
        if !reset::should_reset(self.state().last_reset, now) {
            return false;
        }
        self.apply_reset(now);
        true
    }

    /// Run the daily reset now, whatever the date.
    pub fn force_reset(&mut self) -> ResetOutcome {
        let now = self.clock.now();
        self.apply_reset(now)
    }

    fn apply_reset(&mut self, now: DateTime<Utc>) -> ResetOutcome {
        let outcome = reset::perform_reset(self.state().list(ListType::Daily), now);
        tracing::info!(
            kept = outcome.daily.len(),
            dropped = outcome.dropped,
            previous = %self.state().last_reset,
            "daily list reset"
        );
        self.commit(StatePatch {
            daily: Some(outcome.daily.clone()),
            last_reset: Some(outcome.last_reset),
            ..Default::default()
        });
        outcome
    }

    /// Wipe the store and return to a fresh default state. On failure
    /// nothing in memory changes.
    pub fn clear_all_data(&mut self) -> Result<(), AppError> {
        self.store.clear()?;
        tracing::info!("all data cleared");
        let fresh = AppState::new(self.clock.now());
        self.container.replace(fresh, &mut self.renderer);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the queued state if its debounce deadline has passed. Failures
    /// are logged and reported to the renderer; the next write carries every
    /// change made since.
    pub fn tick(&mut self, now: Instant) {
        if let Some(snapshot) = self.container.take_due_write(now) {
            self.write(&snapshot);
        }
    }

    /// Write the queued state immediately, if any.
    pub fn flush(&mut self) -> Result<(), AppError> {
        match self.container.take_pending_write() {
            Some(snapshot) => save_state(&mut self.store, &snapshot).map_err(|e| {
                tracing::warn!(error = %e, "could not save state");
                AppError::from(e)
            }),
            None => Ok(()),
        }
    }

    fn write(&mut self, snapshot: &AppState) {
        match save_state(&mut self.store, snapshot) {
            Ok(()) => tracing::trace!("state saved"),
            Err(e) => {
                tracing::warn!(error = %e, "could not save state");
                self.renderer.report_error(&AppError::StorageFailure(e));
            }
        }
    }

    /// How long the event loop may sleep before the next write is due.
    pub fn time_until_write(&self, now: Instant) -> Option<Duration> {
        self.container.time_until_write(now)
    }

    /// Stop without flushing. A write still inside its debounce window is
    /// lost; returns whether that happened.
    pub fn shutdown(mut self) -> bool {
        let dropped = self.container.discard_pending();
        if dropped {
            tracing::info!("shutdown dropped an unsaved change");
        }
        dropped
    }
}
