use std::time::{Duration, Instant};

/// A single-slot write queue. Scheduling overwrites whatever is queued and
/// pushes the deadline back, so a burst of changes produces one write
/// carrying the latest value.
#[derive(Debug, Clone)]
pub struct PendingWrite<T> {
    delay: Duration,
    slot: Option<(T, Instant)>,
}

impl<T> PendingWrite<T> {
    pub fn new(delay: Duration) -> Self {
        PendingWrite { delay, slot: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `value`, superseding any earlier queued value.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.slot = Some((value, now + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.slot.as_ref().map(|(_, at)| *at)
    }

    /// Time left until the queued value is due (zero when overdue).
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|at| at.saturating_duration_since(now))
    }

    /// Take the queued value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        if self.deadline().is_some_and(|at| at <= now) {
            self.take_now()
        } else {
            None
        }
    }

    /// Take the queued value regardless of its deadline.
    pub fn take_now(&mut self) -> Option<T> {
        self.slot.take().map(|(value, _)| value)
    }

    /// Drop the queued value without writing it.
    pub fn cancel(&mut self) -> bool {
        self.slot.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn nothing_due_before_deadline() {
        let start = Instant::now();
        let mut pending = PendingWrite::new(DELAY);
        pending.schedule(1, start);
        assert!(pending.take_due(start + Duration::from_millis(99)).is_none());
        assert_eq!(pending.take_due(start + DELAY), Some(1));
        assert!(!pending.is_pending());
        assert!(pending.take_due(start + DELAY * 5).is_none());
    }

    #[test]
    fn later_schedule_supersedes_and_resets_deadline() {
        let start = Instant::now();
        let mut pending = PendingWrite::new(DELAY);
        pending.schedule("first", start);
        pending.schedule("second", start + Duration::from_millis(60));

        // The first deadline has passed but was superseded
        assert!(pending.take_due(start + Duration::from_millis(120)).is_none());
        assert_eq!(
            pending.take_due(start + Duration::from_millis(160)),
            Some("second")
        );
    }

    #[test]
    fn time_until_due_saturates() {
        let start = Instant::now();
        let mut pending = PendingWrite::new(DELAY);
        assert!(pending.time_until_due(start).is_none());
        pending.schedule((), start);
        assert_eq!(
            pending.time_until_due(start + Duration::from_millis(40)),
            Some(Duration::from_millis(60))
        );
        assert_eq!(pending.time_until_due(start + DELAY * 2), Some(Duration::ZERO));
    }

    #[test]
    fn cancel_and_take_now() {
        let start = Instant::now();
        let mut pending = PendingWrite::new(DELAY);
        pending.schedule(7, start);
        assert_eq!(pending.take_now(), Some(7));
        assert!(!pending.cancel());

        pending.schedule(8, start);
        assert!(pending.cancel());
        assert!(pending.take_now().is_none());
    }
}
