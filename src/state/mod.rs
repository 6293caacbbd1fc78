//! The live application state and everything allowed to change it.

pub mod container;
pub mod context;

use chrono::{DateTime, Utc};

use crate::model::state::AppState;

pub use container::StateContainer;
pub use context::{AppContext, AppError};

/// Receives the state after every change, and errors the user should see.
pub trait Renderer {
    fn render(&mut self, state: &AppState);
    fn report_error(&mut self, error: &AppError);
}

/// Wall-clock source for timestamps and the daily reset check
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    /// Counts renders and keeps error messages
    #[derive(Debug, Default)]
    pub struct RecordingRenderer {
        pub renders: usize,
        pub last: Option<AppState>,
        pub errors: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, state: &AppState) {
            self.renders += 1;
            self.last = Some(state.clone());
        }

        fn report_error(&mut self, error: &AppError) {
            self.errors.push(error.to_string());
        }
    }

    /// A clock the test can move
    #[derive(Debug, Clone)]
    pub struct ManualClock(pub Rc<Cell<DateTime<Utc>>>);

    impl ManualClock {
        pub fn at(rfc3339: &str) -> Self {
            let t = DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc);
            ManualClock(Rc::new(Cell::new(t)))
        }

        pub fn set(&self, rfc3339: &str) {
            let t = DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc);
            self.0.set(t);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }
}
