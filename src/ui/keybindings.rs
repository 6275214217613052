use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};

fn hints(mode: UiMode) -> &'static str {
    match mode {
        UiMode::Normal => {
            " ↑/↓ select   Space hide   Enter start   p pause   d done   f flow   \
             c chat   t plan   Tab pane   o open   n new diary   r refresh   q quit"
        }
        UiMode::ChatInput | UiMode::PlanInput => " Enter send   Esc cancel",
        UiMode::PlanReview => " y add as todos   n discard",
        UiMode::DiaryEditor => " Tab switch field   Ctrl+S save   Esc cancel",
        UiMode::Flow => "",
    }
}

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, mode: UiMode, area: Rect) {
    let paragraph = Paragraph::new(hints(mode)).style(hint_style());
    f.render_widget(paragraph, area);
}
