use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::styles::{border_style, default_style, error_style, hint_style, modal_title_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the assistant pane: chat answers, plan suggestions and hourly encouragement
pub fn render_assistant_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let prompt_label = match app.ui_mode {
        UiMode::ChatInput => Some("Chat"),
        UiMode::PlanInput => Some("Plan"),
        _ => None,
    };

    let title = if app.assistant.is_streaming() {
        " 🤖 Assistant (streaming, Esc to stop) "
    } else if app.assistant.pending_plan.is_some() {
        " 🤖 Assistant (planning) "
    } else {
        " 🤖 Assistant "
    };

    let mut lines: Vec<Line> = Vec::new();

    if let Some(label) = prompt_label {
        lines.push(Line::from(vec![
            Span::styled(format!("{} > ", label), modal_title_style()),
            Span::raw(app.input.clone()),
            Span::styled("█", modal_title_style()),
        ]));
        lines.push(Line::raw(""));
    }

    let text_style = if app.assistant.is_error { error_style() } else { default_style() };
    if app.assistant.text.is_empty() && prompt_label.is_none() {
        lines.push(Line::styled("c chat · t plan your day", hint_style()));
    } else {
        lines.extend(
            app.assistant
                .text
                .lines()
                .map(|line| Line::styled(line.to_string(), text_style)),
        );
    }

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
