use std::time::{Duration, Instant};

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// How long to wait for terminal input before the next tick.
/// Never longer than one tick, and shorter when a deadline falls inside it.
pub fn poll_timeout(now: Instant, deadline: Option<Instant>) -> Duration {
    let tick = tick_duration();
    match deadline {
        Some(deadline) => deadline.saturating_duration_since(now).min(tick),
        None => tick,
    }
}
