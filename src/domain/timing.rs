use super::todo::TodoItem;
use chrono::{DateTime, Utc};

/// Total active milliseconds for `item` at `now`.
/// A start time in the future (clock skew) contributes nothing.
pub fn elapsed_ms(item: &TodoItem, now: DateTime<Utc>) -> u64 {
    let running = match (item.active, item.start_time) {
        (true, Some(started)) => now
            .signed_duration_since(started)
            .num_milliseconds()
            .max(0) as u64,
        _ => 0,
    };
    item.duration.saturating_add(running)
}

/// Format milliseconds as "H:MM:SS", or "M:SS" under an hour
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Format milliseconds as "HH:MM:SS" (flow mode always shows hours)
pub fn format_hms(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoAction;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_elapsed_includes_running_interval() {
        let mut item = TodoItem::new("Test");
        item.duration = 5000;
        item.active = true;
        item.start_time = Some(now() - Duration::milliseconds(3000));
        assert_eq!(elapsed_ms(&item, now()), 8000);
    }

    #[test]
    fn test_elapsed_of_inactive_is_duration() {
        let mut item = TodoItem::new("Test");
        item.duration = 1234;
        assert_eq!(elapsed_ms(&item, now()), 1234);
    }

    #[test]
    fn test_elapsed_clamps_future_start() {
        let mut item = TodoItem::new("Test");
        item.duration = 700;
        item.active = true;
        item.start_time = Some(now() + Duration::seconds(30));
        assert_eq!(elapsed_ms(&item, now()), 700);
    }

    #[test]
    fn test_elapsed_is_monotonic_while_running() {
        let mut item = TodoItem::new("Test");
        item.apply(TodoAction::Activate, now());
        let mut last = 0;
        for step in 0..10 {
            let value = elapsed_ms(&item, now() + Duration::milliseconds(step * 350));
            assert!(value >= last);
            last = value;
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65_000), "1:05");
        assert_eq!(format_clock(3_600_000), "1:00:00");
        assert_eq!(format_clock(3_725_999), "1:02:05");
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(8_000), "00:00:08");
        assert_eq!(format_hms(36_061_000), "10:01:01");
    }
}
