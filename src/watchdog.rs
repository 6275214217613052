use log::debug;
use std::time::{Duration, Instant};

/// Default inactivity threshold before flow mode starts
pub const DEFAULT_IDLE_THRESHOLD_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Stopped,
    Running,
    Disposed,
}

/// Single-shot, re-armable inactivity timer.
///
/// The watchdog holds at most one pending deadline. Every [`reset`](Self::reset)
/// cancels the pending deadline before deciding whether to schedule a new one,
/// and a deadline is consumed by the [`poll`](Self::poll) that observes it.
#[derive(Debug)]
pub struct IdleWatchdog {
    threshold: Duration,
    deadline: Option<Instant>,
    lifecycle: Lifecycle,
}

impl IdleWatchdog {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            deadline: None,
            lifecycle: Lifecycle::Stopped,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Begin watching. A disposed watchdog stays disposed.
    pub fn start(&mut self, now: Instant, should_arm: bool) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.lifecycle = Lifecycle::Running;
        self.reset(now, should_arm);
    }

    /// Cancel the pending deadline and stop arming until `start` is called again
    pub fn stop(&mut self) {
        self.deadline = None;
        if self.lifecycle == Lifecycle::Running {
            self.lifecycle = Lifecycle::Stopped;
        }
    }

    /// Cancel the pending deadline permanently
    pub fn dispose(&mut self) {
        self.deadline = None;
        self.lifecycle = Lifecycle::Disposed;
    }

    /// Cancel any pending deadline, then re-arm iff `should_arm`
    pub fn reset(&mut self, now: Instant, should_arm: bool) {
        self.deadline = None;
        if self.lifecycle == Lifecycle::Running && should_arm {
            self.deadline = Some(now + self.threshold);
        }
    }

    /// Returns true exactly once when the pending deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                debug!("idle watchdog fired after {:?}", self.threshold);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for IdleWatchdog {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_IDLE_THRESHOLD_SECS))
    }
}
