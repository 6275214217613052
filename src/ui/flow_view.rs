use crate::app::AppState;
use crate::flow::{FlowSnapshot, EXIT_HINT};
use crate::ui::layout::centered;
use crate::ui::styles::{
    flow_clock_style, flow_encouragement_style, flow_task_style, hint_style, idle_style,
};
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Rect},
    text::Line,
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

/// Render the full-screen flow view
pub fn render_flow_view(f: &mut Frame, app: &AppState, area: Rect) {
    let Some(flow) = &app.flow else {
        return;
    };
    let snapshot = flow.snapshot(&app.todos, Utc::now());

    f.render_widget(Clear, area);

    let body = centered(area, area.width.saturating_sub(4), 9);
    let paragraph = Paragraph::new(flow_lines(&snapshot, flow.click_count()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, body);

    if let Some(next) = &snapshot.next_task {
        let footer = Rect::new(area.x, area.y + area.height.saturating_sub(2), area.width, 1);
        f.render_widget(
            Paragraph::new(Line::styled(format!("下一个任务：{}", next), idle_style()))
                .alignment(Alignment::Center),
            footer,
        );
    }
}

fn flow_lines(snapshot: &FlowSnapshot, clicks: u32) -> Vec<Line<'static>> {
    let hint = match clicks {
        0 => EXIT_HINT.to_string(),
        n => format!("{} ({}/3)", EXIT_HINT, n),
    };

    vec![
        Line::styled(snapshot.task_text.clone(), flow_task_style()),
        Line::raw(""),
        Line::styled(snapshot.elapsed.clone(), flow_clock_style()),
        Line::raw(""),
        Line::styled(snapshot.encouragement.clone(), flow_encouragement_style()),
        Line::raw(""),
        Line::raw(""),
        Line::styled(hint, hint_style()),
    ]
}
