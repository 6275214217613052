use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main dashboard layout
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub todo_area: Rect,
    pub assistant_area: Rect,
    pub diary_list_area: Rect,
    pub diary_preview_area: Rect,
    pub status_area: Rect,
}

/// Create the dashboard layout
/// - Top bar: keybindings (1 row)
/// - Main area: Todos (60%) above Assistant (40%) | Diary list (40%) above Preview (60%)
/// - Bottom bar: status line (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(columns[1]);

    MainLayout {
        keybindings_area: rows[0],
        todo_area: left[0],
        assistant_area: left[1],
        diary_list_area: right[0],
        diary_preview_area: right[1],
        status_area: rows[2],
    }
}

/// Create centered modal area
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Length(18),
            Constraint::Percentage(20),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(15),
            Constraint::Percentage(70),
            Constraint::Percentage(15),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

/// Center a box of at most `width` x `height` inside `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area);

        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 49);
        assert!(layout.todo_area.height > layout.assistant_area.height);
        assert!(layout.diary_preview_area.height > layout.diary_list_area.height);
        assert_eq!(layout.todo_area.x, 0);
        assert_eq!(layout.diary_list_area.x, layout.todo_area.width);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area);

        assert!(modal.width < area.width);
        assert_eq!(modal.height, 18);
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(10, 5, 40, 10);
        assert_eq!(centered(area, 20, 4), Rect::new(20, 8, 20, 4));
        assert_eq!(centered(area, 80, 40), area);
    }
}
