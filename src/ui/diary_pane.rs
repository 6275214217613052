use crate::app::AppState;
use crate::domain::FocusPane;
use crate::ui::styles::{
    border_style, default_style, focused_border_style, hint_style, selected_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Render the list of diaries stored on the server
pub fn render_diary_list(f: &mut Frame, app: &AppState, area: Rect) {
    let focused = app.focus == FocusPane::Diaries;

    let items: Vec<ListItem> = if app.diaries.is_empty() {
        vec![ListItem::new(Line::styled("No diaries. r to refresh", hint_style()))]
    } else {
        app.diaries
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let style = if focused && idx == app.selected_diary {
                    selected_style()
                } else {
                    default_style()
                };
                ListItem::new(Line::raw(name.clone())).style(style)
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if focused { focused_border_style() } else { border_style() })
            .title(Span::styled(format!(" 📓 Diaries ({}) ", app.diaries.len()), title_style())),
    );

    f.render_widget(list, area);
}

/// Render the content of the opened diary
pub fn render_diary_preview(f: &mut Frame, app: &AppState, area: Rect) {
    let (title, lines) = match &app.diary_preview {
        Some((filename, content)) => (
            format!(" {} ", filename),
            content.lines().map(|l| Line::raw(l.to_string())).collect(),
        ),
        None => (
            " Preview ".to_string(),
            vec![Line::styled("o to open the selected diary · n to write one", hint_style())],
        ),
    };

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, title_style())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
