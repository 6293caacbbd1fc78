use std::time::{Duration, Instant};

use crate::io::debounce::PendingWrite;
use crate::model::state::{AppState, StatePatch};

use super::Renderer;

/// Sole owner of the live [`AppState`].
///
/// Every change goes through [`merge_update`](Self::merge_update), which
/// queues a snapshot for the (debounced) store write and re-renders.
#[derive(Debug)]
pub struct StateContainer {
    state: AppState,
    pending: PendingWrite<AppState>,
}

impl StateContainer {
    pub fn new(state: AppState, debounce: Duration) -> Self {
        StateContainer {
            state,
            pending: PendingWrite::new(debounce),
        }
    }

    /// Current state. Clone it to keep a snapshot.
    pub fn read(&self) -> &AppState {
        &self.state
    }

    /// Merge `patch`, queue a write of the result, and re-render.
    pub fn merge_update(&mut self, patch: StatePatch, now: Instant, renderer: &mut dyn Renderer) {
        self.state.merge(patch);
        self.pending.schedule(self.state.clone(), now);
        renderer.render(&self.state);
    }

    /// Swap in a whole new state without queueing a write; any queued
    /// write of the old state is dropped.
    pub fn replace(&mut self, state: AppState, renderer: &mut dyn Renderer) {
        self.state = state;
        self.pending.cancel();
        renderer.render(&self.state);
    }

    /// The queued snapshot, once its deadline has passed.
    pub fn take_due_write(&mut self, now: Instant) -> Option<AppState> {
        self.pending.take_due(now)
    }

    /// The queued snapshot, regardless of deadline.
    pub fn take_pending_write(&mut self) -> Option<AppState> {
        self.pending.take_now()
    }

    pub fn has_pending_write(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn time_until_write(&self, now: Instant) -> Option<Duration> {
        self.pending.time_until_due(now)
    }

    /// Drop the queued write. Returns whether one was queued.
    pub fn discard_pending(&mut self) -> bool {
        self.pending.cancel()
    }
}
