use crate::app::AppState;
use crate::domain::{format_clock, FocusPane, TodoItem};
use crate::ui::styles::{
    border_style, default_style, done_style, focused_border_style, hidden_style, idle_style,
    running_style, selected_style, title_style,
};
use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the todo list pane and remember where its rows are for mouse clicks
pub fn render_list_pane(f: &mut Frame, app: &mut AppState, area: Rect) {
    let now = Utc::now();
    let focused = app.focus == FocusPane::Todos;

    let items: Vec<ListItem> = app
        .todos
        .iter()
        .enumerate()
        .map(|(idx, todo)| {
            let line = create_todo_line(todo, now);
            let style = if focused && idx == app.selected_todo {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let active = app.todos.iter().filter(|t| t.active).count();
    let date = Local::now().format("%a %b %d");
    let title = format!(" 📝 Todos ({}) · {} running ", date, active);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { focused_border_style() } else { border_style() })
        .title(Span::styled(title, title_style()));

    app.todo_rows_area = Some(block.inner(area));

    if items.is_empty() {
        let empty = List::new(vec![ListItem::new(Line::styled(
            "  No todos yet. Press t to plan your day.",
            idle_style(),
        ))]);
        app.todo_list_offset = 0;
        f.render_widget(empty.block(block), area);
        return;
    }

    // Keep the selected row in view; clicks are mapped through the same offset
    let mut state = ListState::default()
        .with_offset(app.todo_list_offset)
        .with_selected(Some(app.selected_todo));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
    app.todo_list_offset = state.offset();
}

/// Format: [▶] Write diary  ⏱ 12:05
fn create_todo_line(todo: &TodoItem, now: DateTime<Utc>) -> Line<'static> {
    let (badge, badge_style) = if todo.completed {
        ("[✓] ", done_style())
    } else if todo.active {
        ("[▶] ", running_style())
    } else {
        ("[ ] ", idle_style())
    };

    let text_style = if todo.hidden {
        hidden_style()
    } else if todo.completed {
        done_style()
    } else {
        default_style()
    };

    let mut spans = vec![
        Span::styled(badge.to_string(), badge_style),
        Span::styled(todo.text.clone(), text_style),
    ];

    let elapsed = todo.elapsed_ms(now);
    if elapsed > 0 || todo.active {
        spans.push(Span::raw("  "));
        let clock_style = if todo.active { running_style() } else { idle_style() };
        spans.push(Span::styled(format!("⏱ {}", format_clock(elapsed)), clock_style));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoAction;
    use chrono::Duration;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_idle_todo_line() {
        let todo = TodoItem::new("写日记");
        let line = create_todo_line(&todo, Utc::now());
        assert_eq!(line_text(&line), "[ ] 写日记");
    }

    #[test]
    fn test_running_todo_line_shows_clock() {
        let t0 = Utc::now();
        let mut todo = TodoItem::new("锻炼");
        todo.apply(TodoAction::Activate, t0);
        let line = create_todo_line(&todo, t0 + Duration::seconds(65));
        assert_eq!(line_text(&line), "[▶] 锻炼  ⏱ 1:05");
    }

    #[test]
    fn test_selected_row_scrolls_into_view() {
        use crate::config::Focus;
        use crate::worker::testing::{FakeBackend, Recorded};
        use ratatui::{backend::TestBackend, Terminal};
        use std::cell::RefCell;
        use std::rc::Rc;
        use std::time::Instant;

        let todos = (1..=20).map(|n| TodoItem::new(format!("任务{}", n))).collect();
        let backend = FakeBackend(Rc::new(RefCell::new(Recorded::default())));
        let mut app = AppState::new(todos, Box::new(backend), Focus::default(), Instant::now());
        app.selected_todo = 15;

        // Eight rows inside the border
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                render_list_pane(f, &mut app, area);
            })
            .unwrap();

        assert_eq!(app.todo_list_offset, 8);
        let area = app.todo_rows_area.unwrap();
        assert_eq!(app.todo_row_at(area.x, area.y), Some(8));
        assert_eq!(app.todo_row_at(area.x, area.y + 7), Some(15));
    }

    #[test]
    fn test_hidden_todo_is_struck_through() {
        let mut todo = TodoItem::new("读书");
        todo.apply(TodoAction::ToggleHidden, Utc::now());
        let line = create_todo_line(&todo, Utc::now());
        assert_eq!(line.spans[1].style, hidden_style());
    }
}
