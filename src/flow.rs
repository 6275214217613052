use crate::domain::{first_active, format_hms, next_pending, TodoItem};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_ENCOURAGEMENT: &str = "保持专注，你做得很好！";
pub const PLACEHOLDER_TASK: &str = "专注当下";
pub const UNNAMED_TASK: &str = "未命名任务";
pub const EXIT_HINT: &str = "三击屏幕退出专注模式";
pub const ENCOURAGEMENT_ROLE: &str = "你是贴心的专注伴侣";

pub const DEFAULT_REFRESH_SECS: u64 = 300;
pub const DEFAULT_CLICK_WINDOW_MS: u64 = 500;
const TICK: Duration = Duration::from_secs(1);

/// Counts clicks that arrive within `window` of the previous one
#[derive(Debug, Clone)]
pub struct ClickCounter {
    window: Duration,
    last_click: Option<Instant>,
    count: u32,
}

impl ClickCounter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_click: None,
            count: 0,
        }
    }

    /// Record a click and return the length of the current streak
    pub fn register(&mut self, now: Instant) -> u32 {
        let in_streak = self
            .last_click
            .map(|last| now.saturating_duration_since(last) < self.window)
            .unwrap_or(false);

        self.count = if in_streak { self.count + 1 } else { 1 };
        self.last_click = Some(now);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.last_click = None;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// What the flow view shows on a given frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSnapshot {
    pub task_text: String,
    pub elapsed: String,
    pub encouragement: String,
    pub next_task: Option<String>,
}

/// A running flow-mode session.
///
/// Owns the per-second tick, the encouragement refresh schedule and the
/// cancellation token of the in-flight encouragement request. Dropping the
/// session cancels that request.
#[derive(Debug)]
pub struct FocusSession {
    clicks: ClickCounter,
    encouragement: String,
    refresh_interval: Duration,
    next_refresh: Instant,
    next_tick: Instant,
    pending_fetch: Option<CancellationToken>,
}

impl FocusSession {
    pub fn new(now: Instant, refresh_interval: Duration, click_window: Duration) -> Self {
        info!("entering flow mode");
        Self {
            clicks: ClickCounter::new(click_window),
            encouragement: DEFAULT_ENCOURAGEMENT.to_string(),
            refresh_interval,
            // Fetch immediately on entry
            next_refresh: now,
            next_tick: now + TICK,
            pending_fetch: None,
        }
    }

    pub fn encouragement(&self) -> &str {
        &self.encouragement
    }

    /// Register a click anywhere in the view. Returns true on the third
    /// click of a streak, after which the streak starts over.
    pub fn register_click(&mut self, now: Instant) -> bool {
        if self.clicks.register(now) >= 3 {
            self.clicks.reset();
            true
        } else {
            false
        }
    }

    pub fn click_count(&self) -> u32 {
        self.clicks.count()
    }

    /// Returns true once per elapsed second so the clock can be redrawn
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_tick {
            return false;
        }
        while self.next_tick <= now {
            self.next_tick += TICK;
        }
        true
    }

    /// When the session next needs attention: the clock tick or the refresh
    pub fn next_deadline(&self) -> Instant {
        self.next_tick.min(self.next_refresh)
    }

    /// Returns true when an encouragement refresh is due, scheduling the next one
    pub fn take_refresh_due(&mut self, now: Instant) -> bool {
        if now < self.next_refresh {
            return false;
        }
        self.next_refresh = now + self.refresh_interval;
        true
    }

    /// Track a new in-flight fetch, cancelling any earlier one
    pub fn begin_fetch(&mut self, token: CancellationToken) {
        if let Some(previous) = self.pending_fetch.replace(token) {
            previous.cancel();
        }
    }

    /// Apply the outcome of a fetch. Failures and empty answers keep the previous text.
    pub fn finish_fetch(&mut self, result: Result<String, String>) {
        self.pending_fetch = None;
        match result {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.encouragement = text.to_string();
                }
            }
            Err(e) => warn!("failed to fetch flow encouragement: {}", e),
        }
    }

    pub fn has_pending_fetch(&self) -> bool {
        self.pending_fetch.is_some()
    }

    pub fn snapshot(&self, todos: &[TodoItem], now: DateTime<Utc>) -> FlowSnapshot {
        let active = first_active(todos);
        FlowSnapshot {
            task_text: active
                .map(|t| t.text.clone())
                .unwrap_or_else(|| PLACEHOLDER_TASK.to_string()),
            elapsed: format_hms(active.map(|t| t.elapsed_ms(now)).unwrap_or(0)),
            encouragement: self.encouragement.clone(),
            next_task: next_pending(todos).map(|t| t.text.clone()),
        }
    }
}

impl Drop for FocusSession {
    fn drop(&mut self) {
        if let Some(token) = self.pending_fetch.take() {
            token.cancel();
        }
    }
}

/// Describe the hour the way the encouragement prompt expects
pub fn time_of_day(hour: u32) -> &'static str {
    if hour < 6 {
        "深夜"
    } else if hour < 9 {
        "清晨"
    } else if hour > 18 {
        "晚上"
    } else {
        "白天"
    }
}

/// Prompt asking for a short encouragement about the task in progress
pub fn encouragement_prompt(task: Option<&str>, hour: u32) -> String {
    format!(
        "我现在正在专注做任务：{}。\n当前时间是{}。\n请给我一句简短的鼓励的话，要在30字以内，不要带引号。\n根据当前时间和任务状态（正在进行中）给出合适的鼓励。",
        task.unwrap_or(UNNAMED_TASK),
        time_of_day(hour)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoAction;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session(t0: Instant) -> FocusSession {
        FocusSession::new(t0, Duration::from_secs(DEFAULT_REFRESH_SECS), ms(DEFAULT_CLICK_WINDOW_MS))
    }

    #[test]
    fn test_triple_click_within_window_exits() {
        let t0 = Instant::now();
        let mut s = session(t0);
        assert!(!s.register_click(t0));
        assert!(!s.register_click(t0 + ms(100)));
        assert!(s.register_click(t0 + ms(200)));
        assert_eq!(s.click_count(), 0);
    }

    #[test]
    fn test_gap_resets_streak() {
        let t0 = Instant::now();
        let mut s = session(t0);
        assert!(!s.register_click(t0));
        assert!(!s.register_click(t0 + ms(600)));
        assert!(!s.register_click(t0 + ms(700)));
        assert_eq!(s.click_count(), 2);
    }

    #[test]
    fn test_click_counter_streaks() {
        let t0 = Instant::now();
        let mut counter = ClickCounter::new(ms(500));
        assert_eq!(counter.register(t0), 1);
        assert_eq!(counter.register(t0 + ms(499)), 2);
        assert_eq!(counter.register(t0 + ms(999)), 1);
        counter.reset();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_refresh_due_on_entry_then_every_interval() {
        let t0 = Instant::now();
        let mut s = session(t0);
        assert!(s.take_refresh_due(t0));
        assert!(!s.take_refresh_due(t0 + Duration::from_secs(299)));
        assert!(s.take_refresh_due(t0 + Duration::from_secs(300)));
        assert!(!s.take_refresh_due(t0 + Duration::from_secs(301)));
    }

    #[test]
    fn test_tick_once_per_second() {
        let t0 = Instant::now();
        let mut s = session(t0);
        assert!(!s.tick(t0 + ms(250)));
        assert!(s.tick(t0 + ms(1_000)));
        assert!(!s.tick(t0 + ms(1_500)));
        assert!(s.tick(t0 + ms(3_200)));
        assert!(!s.tick(t0 + ms(3_900)));
    }

    #[test]
    fn test_next_deadline_follows_tick_and_refresh() {
        let t0 = Instant::now();
        let mut s = session(t0);
        assert_eq!(s.next_deadline(), t0);

        assert!(s.take_refresh_due(t0));
        assert_eq!(s.next_deadline(), t0 + ms(1_000));
        assert!(s.tick(t0 + ms(1_000)));
        assert_eq!(s.next_deadline(), t0 + ms(2_000));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_text() {
        let t0 = Instant::now();
        let mut s = session(t0);
        s.begin_fetch(CancellationToken::new());
        s.finish_fetch(Ok("继续加油".to_string()));
        assert_eq!(s.encouragement(), "继续加油");

        s.begin_fetch(CancellationToken::new());
        s.finish_fetch(Err("connection refused".to_string()));
        assert_eq!(s.encouragement(), "继续加油");
        assert!(!s.has_pending_fetch());

        s.finish_fetch(Ok("   ".to_string()));
        assert_eq!(s.encouragement(), "继续加油");
    }

    #[test]
    fn test_new_fetch_and_drop_cancel_pending() {
        let t0 = Instant::now();
        let mut s = session(t0);
        let first = CancellationToken::new();
        let second = CancellationToken::new();
        s.begin_fetch(first.clone());
        s.begin_fetch(second.clone());
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        drop(s);
        assert!(second.is_cancelled());
    }

    #[test]
    fn test_snapshot_with_active_task() {
        let now: DateTime<Utc> = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let mut todos = vec![TodoItem::new("写日记"), TodoItem::new("锻炼")];
        todos[0].duration = 5_000;
        todos[0].apply(TodoAction::Activate, now - chrono::Duration::seconds(3));

        let s = session(Instant::now());
        let snap = s.snapshot(&todos, now);
        assert_eq!(
            snap,
            FlowSnapshot {
                task_text: "写日记".to_string(),
                elapsed: "00:00:08".to_string(),
                encouragement: DEFAULT_ENCOURAGEMENT.to_string(),
                next_task: Some("锻炼".to_string()),
            }
        );
    }

    #[test]
    fn test_snapshot_without_active_task() {
        let s = session(Instant::now());
        let snap = s.snapshot(&[], Utc::now());
        assert_eq!(snap.task_text, PLACEHOLDER_TASK);
        assert_eq!(snap.elapsed, "00:00:00");
        assert!(snap.next_task.is_none());
    }

    #[test]
    fn test_encouragement_prompt() {
        assert_eq!(time_of_day(3), "深夜");
        assert_eq!(time_of_day(7), "清晨");
        assert_eq!(time_of_day(12), "白天");
        assert_eq!(time_of_day(18), "白天");
        assert_eq!(time_of_day(21), "晚上");

        let prompt = encouragement_prompt(Some("写日记"), 21);
        assert!(prompt.contains("写日记"));
        assert!(prompt.contains("晚上"));
        assert!(encouragement_prompt(None, 10).contains(UNNAMED_TASK));
    }
}
