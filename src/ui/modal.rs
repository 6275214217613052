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

/// Render the plan review modal
pub fn render_plan_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(plan) = &app.plan_proposal {
        let modal_area = create_modal_area(area);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let mut lines = Vec::new();

        lines.push(Line::raw(""));
        if !plan.suggestion.is_empty() {
            lines.push(Line::raw(format!("  {}", plan.suggestion)));
            lines.push(Line::raw(""));
        }

        if plan.schedule.is_empty() {
            lines.push(Line::raw("  (no tasks proposed)"));
        }
        for entry in &plan.schedule {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:>5}  ", entry.time), modal_title_style()),
                Span::raw(entry.task.clone()),
            ]));
        }
        lines.push(Line::raw(""));

        // Options
        lines.push(Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Add as todos  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" Discard"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" 🗓 Proposed Schedule ", modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
