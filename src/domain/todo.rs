use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// The closed set of gestures that may mutate a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoAction {
    ToggleHidden,
    Activate,
    Pause,
    Complete,
}

impl TodoAction {
    /// Wire name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleHidden => "toggle-hidden",
            Self::Activate => "activate",
            Self::Pause => "pause",
            Self::Complete => "complete",
        }
    }
}

impl FromStr for TodoAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle-hidden" => Ok(Self::ToggleHidden),
            "activate" => Ok(Self::Activate),
            "pause" => Ok(Self::Pause),
            "complete" => Ok(Self::Complete),
            _ => Err(()),
        }
    }
}

/// A to-do item with its own stopwatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub active: bool,
    pub hidden: bool,
    /// Set iff `active`
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    /// Milliseconds of earlier active intervals, excluding the running one
    pub duration: u64,
}

impl TodoItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            active: false,
            hidden: false,
            start_time: None,
            duration: 0,
        }
    }

    /// Apply one action in place. Preconditions that fail leave the item untouched.
    pub fn apply(&mut self, action: TodoAction, now: DateTime<Utc>) {
        match action {
            TodoAction::ToggleHidden => {
                self.hidden = !self.hidden;
            }
            TodoAction::Activate => {
                if !self.active {
                    self.active = true;
                    // Stored at millisecond precision, as it is written to disk
                    self.start_time = Some(now.trunc_subsecs(3));
                    self.hidden = false;
                }
            }
            TodoAction::Pause => {
                if self.active {
                    self.fold_running_interval(now);
                }
            }
            TodoAction::Complete => {
                if self.completed {
                    // Un-completing leaves the timer stopped
                    self.completed = false;
                } else {
                    if self.active {
                        self.fold_running_interval(now);
                    }
                    self.completed = true;
                }
            }
        }
    }

    /// Move the running interval into `duration` and stop the timer
    fn fold_running_interval(&mut self, now: DateTime<Utc>) {
        self.duration = super::timing::elapsed_ms(self, now);
        self.active = false;
        self.start_time = None;
    }

    /// Total active time at `now`
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        super::timing::elapsed_ms(self, now)
    }

    /// Neither completed nor currently running
    pub fn is_pending(&self) -> bool {
        !self.completed && !self.active
    }
}

/// Apply `action` to the item with `id`, returning the updated collection.
/// Unknown ids leave the collection unchanged.
pub fn apply_action(
    todos: &[TodoItem],
    id: Uuid,
    action: TodoAction,
    now: DateTime<Utc>,
) -> Vec<TodoItem> {
    todos
        .iter()
        .map(|todo| {
            if todo.id == id {
                let mut updated = todo.clone();
                updated.apply(action, now);
                updated
            } else {
                todo.clone()
            }
        })
        .collect()
}

/// String-dispatch variant of [`apply_action`]. Unrecognised action names are ignored.
pub fn apply_named_action(
    todos: &[TodoItem],
    id: Uuid,
    action: &str,
    now: DateTime<Utc>,
) -> Vec<TodoItem> {
    match action.parse::<TodoAction>() {
        Ok(action) => apply_action(todos, id, action, now),
        Err(()) => todos.to_vec(),
    }
}

/// First item with a running timer
pub fn first_active(todos: &[TodoItem]) -> Option<&TodoItem> {
    todos.iter().find(|t| t.active)
}

/// First item that is waiting to be worked on
pub fn next_pending(todos: &[TodoItem]) -> Option<&TodoItem> {
    todos.iter().find(|t| t.is_pending())
}

pub fn any_active(todos: &[TodoItem]) -> bool {
    todos.iter().any(|t| t.active)
}
