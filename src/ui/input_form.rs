use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the form for writing a new diary
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.editor {
        let modal_area = create_modal_area(area);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let cursor = |field: usize| {
            if form.editing_field == field {
                Span::styled("█", modal_title_style())
            } else {
                Span::raw("")
            }
        };

        let mut lines = Vec::new();

        lines.push(Line::raw(""));
        lines.push(Line::raw(if form.editing_field == 0 {
            "Filename: (editing)"
        } else {
            "Filename:"
        }));
        lines.push(Line::from(vec![
            Span::raw("> "),
            Span::styled(form.filename.clone(), modal_title_style()),
            cursor(0),
        ]));
        lines.push(Line::raw(""));

        lines.push(Line::raw(if form.editing_field == 1 {
            "Diary: (editing)"
        } else {
            "Diary:"
        }));
        let body: Vec<&str> = form.content.split('\n').collect();
        let last = body.len() - 1;
        for (i, text) in body.into_iter().enumerate() {
            let mut spans = vec![Span::raw(text.to_string())];
            if i == last {
                spans.push(cursor(1));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));

        // Instructions
        lines.push(Line::raw("Tab to switch fields  ·  Ctrl+S to save  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" ✍ New Diary ", modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
