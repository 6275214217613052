use super::todo::TodoItem;
use serde::{Deserialize, Serialize};

/// One slot of a proposed schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub time: String,
    pub task: String,
}

/// Answer of the task-planning endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

impl ScheduleEntry {
    /// Label used for the todo created from this entry
    pub fn label(&self) -> String {
        let time = self.time.trim();
        let task = self.task.trim();
        if time.is_empty() {
            task.to_string()
        } else {
            format!("{} {}", time, task)
        }
    }
}

impl PlanResponse {
    /// Fresh todos for every schedule entry, in order
    pub fn to_todos(&self) -> Vec<TodoItem> {
        self.schedule
            .iter()
            .filter(|entry| !entry.task.trim().is_empty())
            .map(|entry| TodoItem::new(entry.label()))
            .collect()
    }
}
