//! Search clock and the soft-stop decision.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Decides whether iterative deepening should start another depth.
///
/// Consulted after every completed depth once a soft limit is set. The
/// hard limit is enforced by the search itself and cannot be overridden.
pub trait TimeAuthority: Send + Sync {
    /// `stable` is true once the best move stayed unchanged for two more
    /// completed depths, i.e. the last three depths agree.
    fn should_stop(&self, elapsed: Duration, soft_limit: Duration, stable: bool) -> bool;
}

/// Stop at the soft limit only when the best move is stable.
#[derive(Clone, Copy, Debug, Default)]
pub struct StabilityAuthority;

impl TimeAuthority for StabilityAuthority {
    fn should_stop(&self, elapsed: Duration, soft_limit: Duration, stable: bool) -> bool {
        stable && elapsed >= soft_limit
    }
}

/// Start time and deadlines of a running search.
///
/// Deadlines sit behind a mutex so a controller thread can move them
/// while the search runs, e.g. when a ponder search becomes a real one.
pub struct SearchClock {
    start_time: Mutex<Instant>,
    soft_deadline: Mutex<Option<Instant>>,
    hard_deadline: Mutex<Option<Instant>>,
}

impl SearchClock {
    #[must_use]
    pub fn new(
        start_time: Instant,
        soft_deadline: Option<Instant>,
        hard_deadline: Option<Instant>,
    ) -> Self {
        SearchClock {
            start_time: Mutex::new(start_time),
            soft_deadline: Mutex::new(soft_deadline),
            hard_deadline: Mutex::new(hard_deadline),
        }
    }

    /// Clock starting now; a zero limit means none.
    #[must_use]
    pub fn from_limits(soft_limit_ms: u64, hard_limit_ms: u64) -> Self {
        let now = Instant::now();
        let deadline = |ms: u64| (ms > 0).then(|| now + Duration::from_millis(ms));
        SearchClock::new(now, deadline(soft_limit_ms), deadline(hard_limit_ms))
    }

    pub fn reset(
        &self,
        start_time: Instant,
        soft_deadline: Option<Instant>,
        hard_deadline: Option<Instant>,
    ) {
        *self.start_time.lock() = start_time;
        *self.soft_deadline.lock() = soft_deadline;
        *self.hard_deadline.lock() = hard_deadline;
    }

    pub fn snapshot(&self) -> (Instant, Option<Instant>, Option<Instant>) {
        let start_time = *self.start_time.lock();
        let soft_deadline = *self.soft_deadline.lock();
        let hard_deadline = *self.hard_deadline.lock();
        (start_time, soft_deadline, hard_deadline)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.lock().elapsed()
    }

    #[must_use]
    pub fn hard_expired(&self) -> bool {
        self.hard_deadline
            .lock()
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Soft and hard limits as durations from the start, if set.
    #[must_use]
    pub fn limits(&self) -> (Option<Duration>, Option<Duration>) {
        let (start, soft, hard) = self.snapshot();
        let since = |d: Option<Instant>| d.map(|d| d.saturating_duration_since(start));
        (since(soft), since(hard))
    }
}

impl Default for SearchClock {
    fn default() -> Self {
        SearchClock::new(Instant::now(), None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stability_authority_needs_both() {
        let auth = StabilityAuthority;
        let soft = Duration::from_millis(100);
        assert!(!auth.should_stop(Duration::from_millis(150), soft, false));
        assert!(!auth.should_stop(Duration::from_millis(50), soft, true));
        assert!(auth.should_stop(Duration::from_millis(150), soft, true));
    }

    #[test]
    fn test_clock_limits() {
        let clock = SearchClock::from_limits(100, 0);
        let (soft, hard) = clock.limits();
        assert_eq!(soft, Some(Duration::from_millis(100)));
        assert_eq!(hard, None);
        assert!(!clock.hard_expired());

        let start = Instant::now() - Duration::from_secs(5);
        clock.reset(start, None, Some(start + Duration::from_secs(1)));
        assert!(clock.hard_expired());
        assert!(clock.elapsed() >= Duration::from_secs(5));
    }
}
