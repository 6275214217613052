use crate::api::DiaryDocument;
use crate::assistant::{chat_message, CHAT_ROLE};
use crate::config::Focus;
use crate::domain::{
    any_active, apply_action, first_active, ActivityEvent, DiaryFormat, FocusPane, PlanResponse,
    TodoAction, TodoItem, UiMode,
};
use crate::flow::{encouragement_prompt, ClickCounter, FocusSession, ENCOURAGEMENT_ROLE};
use crate::persistence::save_todos;
use crate::watchdog::IdleWatchdog;
use crate::worker::{Backend, Request, RequestId, WorkerEvent};
use anyhow::Result;
use chrono::{Local, Timelike, Utc};
use log::{debug, error, info, warn};
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use uuid::Uuid;

const HOURLY_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Text shown in the assistant pane and the request feeding it
#[derive(Debug, Default)]
pub struct AssistantPane {
    pub text: String,
    pub is_error: bool,
    pub chat: Option<Request>,
    pub pending_plan: Option<RequestId>,
}

impl AssistantPane {
    pub fn is_streaming(&self) -> bool {
        self.chat.is_some()
    }

    fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.is_error = false;
    }

    fn show_error(&mut self, text: impl Into<String>) {
        self.text = format!("Error: {}", text.into());
        self.is_error = true;
    }

    fn cancel_chat(&mut self) {
        if let Some(chat) = self.chat.take() {
            chat.cancel.cancel();
        }
    }
}

/// Form state for writing a new diary
#[derive(Debug, Clone, Default)]
pub struct DiaryEditorState {
    pub filename: String,
    pub content: String,
    pub editing_field: usize, // 0 = filename, 1 = body
}

impl DiaryEditorState {
    pub fn new() -> Self {
        Self {
            filename: Local::now().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn to_document(&self) -> DiaryDocument {
        DiaryDocument {
            filename: self.filename.trim().to_string(),
            content: self.content.clone(),
            format: DiaryFormat::from_filename(self.filename.trim()),
        }
    }
}

/// Main application state
pub struct AppState {
    pub todos: Vec<TodoItem>,
    pub selected_todo: usize,
    pub focus: FocusPane,
    pub ui_mode: UiMode,
    pub input: String,
    pub assistant: AssistantPane,
    pub plan_proposal: Option<PlanResponse>,
    pub diaries: Vec<String>,
    pub selected_diary: usize,
    pub diary_preview: Option<(String, String)>,
    pub editor: Option<DiaryEditorState>,
    pub status: Option<String>,
    pub watchdog: IdleWatchdog,
    pub flow: Option<FocusSession>,
    pub needs_save: bool,
    pub needs_redraw: bool,
    /// Where the todo rows were last drawn, for mouse hit-testing
    pub todo_rows_area: Option<Rect>,
    /// First todo visible in the list after the last render
    pub todo_list_offset: usize,
    flow_fetch: Option<RequestId>,
    /// Mode to return to when flow mode ends
    mode_before_flow: UiMode,
    row_clicks: ClickCounter,
    last_clicked_row: Option<usize>,
    hourly_next: Option<Instant>,
    focus_config: Focus,
    todos_path: Option<PathBuf>,
    backend: Box<dyn Backend>,
}

impl AppState {
    pub fn new(todos: Vec<TodoItem>, backend: Box<dyn Backend>, focus_config: Focus, now: Instant) -> Self {
        let mut watchdog = IdleWatchdog::new(focus_config.idle_threshold());
        watchdog.start(now, any_active(&todos));

        Self {
            todos,
            selected_todo: 0,
            focus: FocusPane::Todos,
            ui_mode: UiMode::Normal,
            input: String::new(),
            assistant: AssistantPane::default(),
            plan_proposal: None,
            diaries: Vec::new(),
            selected_diary: 0,
            diary_preview: None,
            editor: None,
            status: None,
            watchdog,
            flow: None,
            needs_save: false,
            needs_redraw: true,
            todo_rows_area: None,
            todo_list_offset: 0,
            flow_fetch: None,
            mode_before_flow: UiMode::Normal,
            row_clicks: ClickCounter::new(focus_config.click_window()),
            last_clicked_row: None,
            hourly_next: focus_config.hourly_encouragement.then(|| now + HOURLY_INTERVAL),
            focus_config,
            todos_path: None,
            backend,
        }
    }

    /// Persist todos to `path` whenever they change
    pub fn with_todos_path(mut self, path: PathBuf) -> Self {
        self.todos_path = Some(path);
        self
    }

    pub fn is_flow_mode(&self) -> bool {
        self.flow.is_some()
    }

    /// Watchdog arming condition: a timer is running and flow mode is not already on
    fn should_arm(&self) -> bool {
        any_active(&self.todos) && self.flow.is_none()
    }

    fn rearm_watchdog(&mut self, now: Instant) {
        let should_arm = self.should_arm();
        self.watchdog.reset(now, should_arm);
    }

    // ---- todo lifecycle -------------------------------------------------

    /// The single entry point for todo mutations
    pub fn dispatch(&mut self, id: Uuid, action: TodoAction, now: Instant) {
        let updated = apply_action(&self.todos, id, action, Utc::now());
        if updated != self.todos {
            debug!("todo {} {}", id, action.name());
            self.todos = updated;
            self.needs_save = true;
        }
        self.rearm_watchdog(now);
    }

    pub fn selected_todo_id(&self) -> Option<Uuid> {
        self.todos.get(self.selected_todo).map(|t| t.id)
    }

    pub fn act_on_selected(&mut self, action: TodoAction, now: Instant) {
        if let Some(id) = self.selected_todo_id() {
            self.dispatch(id, action, now);
        }
    }

    /// Click on a todo row: a single click toggles hidden, a double click activates
    pub fn click_todo_row(&mut self, row: usize, now: Instant) {
        let Some(id) = self.todos.get(row).map(|t| t.id) else {
            return;
        };
        self.focus = FocusPane::Todos;
        self.selected_todo = row;

        if self.last_clicked_row != Some(row) {
            self.row_clicks.reset();
        }
        self.last_clicked_row = Some(row);

        if self.row_clicks.register(now) >= 2 {
            self.row_clicks.reset();
            self.dispatch(id, TodoAction::Activate, now);
        } else {
            self.dispatch(id, TodoAction::ToggleHidden, now);
        }
    }

    /// Map a terminal position to a todo row, if it hits one
    pub fn todo_row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.todo_rows_area?;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return None;
        }
        let index = self.todo_list_offset + (row - area.y) as usize;
        (index < self.todos.len()).then_some(index)
    }

    /// Close whatever modal is open, showing a waiting plan proposal first
    fn return_to_dashboard(&mut self) {
        self.ui_mode = if self.plan_proposal.is_some() {
            UiMode::PlanReview
        } else {
            UiMode::Normal
        };
    }

    // ---- activity & timers ---------------------------------------------

    /// Any qualifying user input restarts the idle countdown
    pub fn record_activity(&mut self, event: ActivityEvent, now: Instant) {
        if event != ActivityEvent::PointerMove {
            debug!("activity: {:?}", event);
        }
        self.rearm_watchdog(now);
    }

    /// Advance timers and apply finished background work
    pub fn tick(&mut self, now: Instant) {
        if self.flow.is_none() && self.watchdog.poll(now) {
            info!("no activity for {:?}, entering flow mode", self.watchdog.threshold());
            self.enter_flow(now);
        }

        let refresh_due = match self.flow.as_mut() {
            Some(flow) => {
                // The flow clock only changes once a second
                if flow.tick(now) {
                    self.needs_redraw = true;
                }
                flow.take_refresh_due(now)
            }
            None => {
                self.needs_redraw = true;
                false
            }
        };
        if refresh_due {
            self.request_flow_encouragement();
        }

        if let Some(next) = self.hourly_next {
            if self.flow.is_none() && now >= next {
                self.backend.fetch_hourly_encouragement();
                self.hourly_next = Some(now + HOURLY_INTERVAL);
            }
        }

        for event in self.backend.poll_events() {
            self.handle_worker_event(event);
            self.needs_redraw = true;
        }
    }

    /// The earliest timer deadline, so the event loop can wake up for it
    pub fn next_deadline(&self) -> Option<Instant> {
        let flow = self.flow.as_ref().map(|flow| flow.next_deadline());
        match (self.watchdog.deadline(), flow) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Returns true once after anything on screen changed
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // ---- flow mode ------------------------------------------------------

    pub fn enter_flow(&mut self, now: Instant) {
        if self.flow.is_some() {
            return;
        }
        self.flow = Some(FocusSession::new(
            now,
            self.focus_config.refresh_interval(),
            self.focus_config.click_window(),
        ));
        self.mode_before_flow = self.ui_mode;
        self.ui_mode = UiMode::Flow;
        self.needs_redraw = true;
        self.rearm_watchdog(now);
    }

    pub fn exit_flow(&mut self, now: Instant) {
        if self.flow.take().is_none() {
            return;
        }
        info!("leaving flow mode");
        self.flow_fetch = None;
        // Drafts in an open prompt or editor are picked up where they were left
        match std::mem::replace(&mut self.mode_before_flow, UiMode::Normal) {
            UiMode::Normal | UiMode::Flow => self.return_to_dashboard(),
            mode => self.ui_mode = mode,
        }
        self.needs_redraw = true;
        self.rearm_watchdog(now);
    }

    /// A click anywhere in the flow view; three quick clicks leave flow mode
    pub fn flow_click(&mut self, now: Instant) {
        let exit = self
            .flow
            .as_mut()
            .map(|flow| flow.register_click(now))
            .unwrap_or(false);
        if exit {
            self.exit_flow(now);
        }
    }

    fn request_flow_encouragement(&mut self) {
        let task = first_active(&self.todos).map(|t| t.text.clone());
        let prompt = encouragement_prompt(task.as_deref(), Local::now().hour());
        let request = self.backend.fetch_encouragement(ENCOURAGEMENT_ROLE, prompt);
        if let Some(flow) = self.flow.as_mut() {
            flow.begin_fetch(request.cancel);
            self.flow_fetch = Some(request.id);
        } else {
            request.cancel.cancel();
        }
    }

    // ---- assistant input -------------------------------------------------

    pub fn start_chat_input(&mut self) {
        self.input.clear();
        self.ui_mode = UiMode::ChatInput;
    }

    pub fn start_plan_input(&mut self) {
        self.input.clear();
        self.ui_mode = UiMode::PlanInput;
    }

    pub fn input_add_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input.pop();
    }

    pub fn cancel_input(&mut self) {
        self.input.clear();
        self.return_to_dashboard();
    }

    /// Send the typed text as a chat message or a planning request
    pub fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        let mode = self.ui_mode;
        self.return_to_dashboard();

        if text.trim().is_empty() {
            return;
        }
        match mode {
            UiMode::ChatInput => self.send_chat(&text),
            UiMode::PlanInput => self.request_plan(&text),
            _ => {}
        }
    }

    pub fn send_chat(&mut self, text: &str) {
        self.assistant.cancel_chat();
        self.assistant.show("");
        let request = self.backend.start_chat(CHAT_ROLE, chat_message(text));
        self.assistant.chat = Some(request);
    }

    pub fn cancel_chat(&mut self) {
        self.assistant.cancel_chat();
    }

    pub fn request_plan(&mut self, text: &str) {
        let id = self.backend.request_plan(text.trim().to_string());
        self.assistant.pending_plan = Some(id);
        self.assistant.show("Planning...");
    }

    /// Turn the proposed schedule into todos
    pub fn accept_plan(&mut self, now: Instant) {
        if let Some(plan) = self.plan_proposal.take() {
            let new_todos = plan.to_todos();
            info!("accepted plan with {} tasks", new_todos.len());
            self.todos.extend(new_todos);
            self.needs_save = true;
        }
        self.return_to_dashboard();
        self.rearm_watchdog(now);
    }

    pub fn reject_plan(&mut self) {
        self.plan_proposal = None;
        self.return_to_dashboard();
    }

    // ---- diaries ----------------------------------------------------------

    pub fn refresh_diaries(&mut self) {
        self.backend.refresh_diaries();
    }

    pub fn open_selected_diary(&mut self) {
        if let Some(name) = self.diaries.get(self.selected_diary).cloned() {
            self.backend.open_diary(name);
        }
    }

    pub fn start_new_diary(&mut self) {
        self.editor = Some(DiaryEditorState::new());
        self.ui_mode = UiMode::DiaryEditor;
    }

    pub fn editor_toggle_field(&mut self) {
        if let Some(editor) = &mut self.editor {
            editor.editing_field = (editor.editing_field + 1) % 2;
        }
    }

    pub fn editor_add_char(&mut self, c: char) {
        if let Some(editor) = &mut self.editor {
            match editor.editing_field {
                0 => editor.filename.push(c),
                _ => editor.content.push(c),
            }
        }
    }

    pub fn editor_newline(&mut self) {
        if let Some(editor) = &mut self.editor {
            if editor.editing_field == 0 {
                editor.editing_field = 1;
            } else {
                editor.content.push('\n');
            }
        }
    }

    pub fn editor_backspace(&mut self) {
        if let Some(editor) = &mut self.editor {
            match editor.editing_field {
                0 => {
                    editor.filename.pop();
                }
                _ => {
                    editor.content.pop();
                }
            }
        }
    }

    pub fn save_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        if editor.filename.trim().is_empty() {
            self.status = Some("Diary needs a filename".to_string());
            self.editor = Some(editor);
            return;
        }
        self.backend.save_diary(editor.to_document());
        self.status = Some(format!("Saving {}...", editor.filename.trim()));
        self.return_to_dashboard();
    }

    pub fn cancel_editor(&mut self) {
        self.editor = None;
        self.return_to_dashboard();
    }

    // ---- navigation -----------------------------------------------------

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    pub fn move_selection_up(&mut self) {
        match self.focus {
            FocusPane::Todos => self.selected_todo = self.selected_todo.saturating_sub(1),
            FocusPane::Diaries => self.selected_diary = self.selected_diary.saturating_sub(1),
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.focus {
            FocusPane::Todos => {
                if self.selected_todo + 1 < self.todos.len() {
                    self.selected_todo += 1;
                }
            }
            FocusPane::Diaries => {
                if self.selected_diary + 1 < self.diaries.len() {
                    self.selected_diary += 1;
                }
            }
        }
    }

    // ---- background results ------------------------------------------

    pub fn handle_worker_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Encouragement { id, result } => {
                if self.flow_fetch == Some(id) {
                    self.flow_fetch = None;
                    if let Some(flow) = self.flow.as_mut() {
                        flow.finish_fetch(result);
                    }
                }
            }
            WorkerEvent::HourlyEncouragement(result) => match result {
                Ok(text) if !self.assistant.is_streaming() => self.assistant.show(text.trim()),
                Ok(_) => {}
                Err(e) => warn!("failed to fetch encouragement: {}", e),
            },
            WorkerEvent::ChatChunk { id, text } => {
                if self.assistant.chat.as_ref().map(|c| c.id) == Some(id) {
                    self.assistant.text.push_str(&text);
                }
            }
            WorkerEvent::ChatFinished { id, error } => {
                if self.assistant.chat.as_ref().map(|c| c.id) == Some(id) {
                    self.assistant.chat = None;
                    if let Some(e) = error {
                        error!("chat failed: {}", e);
                        self.assistant.show_error(e);
                    }
                }
            }
            WorkerEvent::Plan { id, result } => {
                if self.assistant.pending_plan != Some(id) {
                    return;
                }
                self.assistant.pending_plan = None;
                match result {
                    Ok(plan) => {
                        self.assistant.show(plan.suggestion.clone());
                        self.plan_proposal = Some(plan);
                        if self.ui_mode == UiMode::Normal {
                            self.ui_mode = UiMode::PlanReview;
                        }
                    }
                    Err(e) => {
                        error!("task planning failed: {}", e);
                        self.assistant.show_error(e);
                    }
                }
            }
            WorkerEvent::DiaryList(result) => match result {
                Ok(files) => {
                    self.diaries = files;
                    if self.selected_diary >= self.diaries.len() {
                        self.selected_diary = self.diaries.len().saturating_sub(1);
                    }
                }
                Err(e) => {
                    warn!("failed to list diaries: {}", e);
                    self.status = Some(format!("Could not load diaries: {}", e));
                }
            },
            WorkerEvent::DiaryOpened { filename, result } => match result {
                Ok(diary) => self.diary_preview = Some((filename, diary.content)),
                Err(e) => self.status = Some(format!("Could not open {}: {}", filename, e)),
            },
            WorkerEvent::DiarySaved(result) => match result {
                Ok(filename) => {
                    self.status = Some(format!("Saved {}", filename));
                    self.backend.refresh_diaries();
                }
                Err(e) => self.status = Some(format!("Save failed: {}", e)),
            },
        }
    }

    // ---- lifecycle --------------------------------------------------------

    pub fn save(&mut self) -> Result<()> {
        if let Some(path) = &self.todos_path {
            save_todos(path, &self.todos)?;
        }
        self.needs_save = false;
        Ok(())
    }

    /// Tear down every timer and in-flight request
    pub fn shutdown(&mut self) {
        self.flow = None;
        self.flow_fetch = None;
        self.watchdog.dispose();
        self.assistant.cancel_chat();
        self.backend.shutdown();
    }
}
