use crate::app::AppState;
use crate::domain::{ActivityEvent, FocusPane, TodoAction, UiMode};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Instant;

/// Handle a terminal event. Returns true when the user asked to quit.
pub fn handle_event(app: &mut AppState, event: Event, now: Instant) -> bool {
    match event {
        // Only process key press events (ignore key release)
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            app.record_activity(ActivityEvent::KeyPress, now);
            handle_key(app, key, now)
        }
        Event::Mouse(mouse) => {
            handle_mouse(app, mouse, now);
            false
        }
        _ => false,
    }
}

/// Which watchdog activity a mouse event counts as
fn mouse_activity(kind: MouseEventKind) -> Option<ActivityEvent> {
    match kind {
        MouseEventKind::Down(_) => Some(ActivityEvent::PointerDown),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(ActivityEvent::PointerMove),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => Some(ActivityEvent::Scroll),
        MouseEventKind::Up(_) => None,
    }
}

/// Handle mouse input events
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent, now: Instant) {
    if let Some(activity) = mouse_activity(mouse.kind) {
        app.record_activity(activity, now);
    }

    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    match app.ui_mode {
        UiMode::Flow => app.flow_click(now),
        UiMode::Normal => {
            if let Some(row) = app.todo_row_at(mouse.column, mouse.row) {
                app.click_todo_row(row, now);
            }
        }
        _ => {}
    }
}

/// Handle keyboard input events
pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key, now),
        UiMode::ChatInput | UiMode::PlanInput => {
            handle_prompt_mode(app, key);
            false
        }
        UiMode::PlanReview => {
            handle_plan_review_mode(app, key, now);
            false
        }
        UiMode::DiaryEditor => {
            handle_editor_mode(app, key);
            false
        }
        UiMode::Flow => {
            // Space stands in for a click
            if key.code == KeyCode::Char(' ') {
                app.flow_click(now);
            }
            false
        }
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent, now: Instant) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Tab => app.toggle_focus(),

        // Todo lifecycle
        KeyCode::Char(' ') => app.act_on_selected(TodoAction::ToggleHidden, now),
        KeyCode::Enter if app.focus == FocusPane::Todos => app.act_on_selected(TodoAction::Activate, now),
        KeyCode::Enter => app.open_selected_diary(),
        KeyCode::Char('p') | KeyCode::Char('P') => app.act_on_selected(TodoAction::Pause, now),
        KeyCode::Char('d') | KeyCode::Char('D') => app.act_on_selected(TodoAction::Complete, now),

        // Flow mode on demand
        KeyCode::Char('f') | KeyCode::Char('F') => app.enter_flow(now),

        // Assistant
        KeyCode::Char('c') | KeyCode::Char('C') => app.start_chat_input(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.start_plan_input(),
        KeyCode::Esc => app.cancel_chat(),

        // Diaries
        KeyCode::Char('r') | KeyCode::Char('R') => app.refresh_diaries(),
        KeyCode::Char('o') | KeyCode::Char('O') => app.open_selected_diary(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.start_new_diary(),

        _ => {}
    }
    false
}

/// Handle keys while typing a chat message or planning request
fn handle_prompt_mode(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_add_char(c),
        _ => {}
    }
}

fn handle_plan_review_mode(app: &mut AppState, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.accept_plan(now),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.reject_plan(),
        _ => {}
    }
}

/// Handle keys in the diary editor form
fn handle_editor_mode(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => app.save_editor(),
        KeyCode::Esc => app.cancel_editor(),
        KeyCode::Tab => app.editor_toggle_field(),
        KeyCode::Enter => app.editor_newline(),
        KeyCode::Backspace => app.editor_backspace(),
        KeyCode::Char(c) => app.editor_add_char(c),
        _ => {}
    }
}
