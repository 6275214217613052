use super::files::{atomic_write, read_file};
use crate::domain::TodoItem;
use anyhow::{Context, Result};
use std::path::Path;

/// Load todos from a JSON file. A missing or empty file yields an empty list.
pub fn load_todos<P: AsRef<Path>>(path: P) -> Result<Vec<TodoItem>> {
    let path = path.as_ref();
    let content = read_file(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse todos: {}", path.display()))
}

pub fn save_todos<P: AsRef<Path>>(path: P, todos: &[TodoItem]) -> Result<()> {
    let content = serde_json::to_string_pretty(todos).context("Failed to serialize todos")?;
    atomic_write(path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoAction;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let todos = load_todos(temp_dir.path().join("todos.json")).unwrap();
        assert!(todos.is_empty());
    }

    #[test]
    fn test_save_and_load_preserves_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("todos.json");
        let started: DateTime<Utc> = DateTime::from_timestamp_millis(1_700_000_123_456).unwrap();

        let mut todos = vec![TodoItem::new("09:00 写日记"), TodoItem::new("10:00 锻炼")];
        todos[0].apply(TodoAction::Activate, started);
        todos[1].duration = 90_000;
        todos[1].completed = true;
        todos[1].hidden = true;

        save_todos(&path, &todos).unwrap();
        let loaded = load_todos(&path).unwrap();
        assert_eq!(loaded, todos);
        assert!(loaded[1].start_time.is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("todos.json");
        atomic_write(&path, "[{").unwrap();
        assert!(load_todos(&path).is_err());
    }
}
