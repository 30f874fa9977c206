//! Search limits and the optional move deadline.
//!
//! The clock is only consulted every `check_interval` nodes; between checks
//! the search only reads the stop flag.

use std::time::{Duration, Instant};

/// What the caller allows a search to spend.
///
/// The time limit takes precedence: once it expires the search unwinds and
/// answers with the best move of the last completed depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum search depth in plies (half-moves)
    pub depth: u8,
    /// Maximum time allowed for this move (None = no deadline)
    pub move_time: Option<Duration>,
}

impl SearchLimits {
    /// Create limits with only depth constraint (no time limit).
    pub fn depth(depth: u8) -> Self {
        Self {
            depth,
            move_time: None,
        }
    }

    /// Create limits with both depth and time constraints.
    pub fn depth_and_time(depth: u8, move_time: Duration) -> Self {
        Self {
            depth,
            move_time: Some(move_time),
        }
    }

    /// Clock for one search under these limits.
    pub fn time_control(&self) -> TimeControl {
        TimeControl::new(self.move_time)
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(3)
    }
}

/// Tracks whether a running search should stop. Owned by the search.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: bool,
    /// Start time of the search
    start_time: Option<Instant>,
    /// Time limit for this search (None = infinite)
    time_limit: Option<Duration>,
    /// How often to check the clock (in nodes). Checking every node is wasteful.
    check_interval: u64,
}

impl TimeControl {
    pub const DEFAULT_CHECK_INTERVAL: u64 = 1024;

    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            stopped: false,
            start_time: None,
            time_limit,
            check_interval: Self::DEFAULT_CHECK_INTERVAL,
        }
    }

    /// Check the clock every `interval` nodes instead (minimum 1).
    pub fn with_check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    /// Start the clock. Should be called when search begins.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.stopped = false;
    }

    /// Force stop the search immediately.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn has_deadline(&self) -> bool {
        self.time_limit.is_some()
    }

    /// Check time and update stopped flag if time expired.
    pub fn check_time(&mut self) -> bool {
        if self.stopped {
            return true;
        }

        let expired = match (self.time_limit, self.start_time) {
            (Some(limit), Some(start)) => start.elapsed() >= limit,
            _ => false,
        };
        if expired {
            self.stop();
        }
        expired
    }

    /// Returns true every `check_interval` nodes.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes % self.check_interval == 0
    }

    /// Get elapsed time since search started.
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
