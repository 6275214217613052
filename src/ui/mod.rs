pub mod assistant_pane;
pub mod diary_pane;
pub mod flow_view;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::AppState;
use crate::domain::UiMode;
use assistant_pane::render_assistant_pane;
use diary_pane::{render_diary_list, render_diary_preview};
use flow_view::render_flow_view;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_plan_modal;
use ratatui::{text::Line, widgets::Paragraph, Frame};
use styles::hint_style;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &mut AppState) {
    let size = f.size();

    // Flow mode takes over the whole screen
    if app.ui_mode == UiMode::Flow {
        render_flow_view(f, app, size);
        return;
    }

    let layout = create_layout(size);

    render_keybindings(f, app.ui_mode, layout.keybindings_area);

    render_list_pane(f, app, layout.todo_area);
    render_assistant_pane(f, app, layout.assistant_area);
    render_diary_list(f, app, layout.diary_list_area);
    render_diary_preview(f, app, layout.diary_preview_area);

    if let Some(status) = &app.status {
        f.render_widget(
            Paragraph::new(Line::styled(format!(" {}", status), hint_style())),
            layout.status_area,
        );
    }

    if app.ui_mode == UiMode::PlanReview {
        render_plan_modal(f, app, size);
    }

    if app.ui_mode == UiMode::DiaryEditor {
        render_input_form(f, app, size);
    }
}
