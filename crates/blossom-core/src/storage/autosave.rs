//! Periodic auto-commit scheduling.
//!
//! The session owns the clock: it passes `now` into [`AutoCommit::is_due`]
//! from whatever tick source the host provides, so the schedule is testable
//! without sleeping.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Schedule for the background commit of the current page.
#[derive(Debug, Clone)]
pub struct AutoCommit {
    /// Period between commits.
    interval: Duration,
    /// Start of the current period.
    last_flush: Option<Instant>,
    running: bool,
}

impl AutoCommit {
    /// Create a stopped schedule with the given period.
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs.max(1)),
            last_flush: None,
            running: false,
        }
    }

    /// Start the schedule. The first commit is due one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.running = true;
        self.last_flush = Some(now);
        log::debug!("Auto-commit started ({}s)", self.interval.as_secs());
    }

    /// Stop the schedule. Safe to call more than once.
    pub fn cancel(&mut self) {
        if self.running {
            log::debug!("Auto-commit cancelled");
        }
        self.running = false;
        self.last_flush = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a full interval has passed since the last flush.
    pub fn is_due(&self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        match self.last_flush {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Begin a new period at `now`.
    pub fn mark_flushed(&mut self, now: Instant) {
        if self.running {
            self.last_flush = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_until_started() {
        let schedule = AutoCommit::new(30);
        assert!(!schedule.is_running());
        assert!(!schedule.is_due(Instant::now()));
    }

    #[test]
    fn test_due_after_interval() {
        let start = Instant::now();
        let mut schedule = AutoCommit::new(30);
        schedule.start(start);

        assert!(!schedule.is_due(start + Duration::from_secs(29)));
        assert!(schedule.is_due(start + Duration::from_secs(30)));

        schedule.mark_flushed(start + Duration::from_secs(30));
        assert!(!schedule.is_due(start + Duration::from_secs(45)));
        assert!(schedule.is_due(start + Duration::from_secs(61)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut schedule = AutoCommit::new(1);
        schedule.start(start);
        schedule.cancel();
        schedule.cancel();

        assert!(!schedule.is_running());
        assert!(!schedule.is_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_interval_clamped() {
        assert_eq!(AutoCommit::new(0).interval(), Duration::from_secs(1));
    }
}
