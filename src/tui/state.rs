//! TUI state types
//!
//! Everything the views render lives here. Network work is requested through
//! [`PendingAction`] and carried out by the runner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use todostore::{Todo, TodoId};

use crate::server::SummarizeResponse;

/// How long a status message stays on screen
pub const STATUS_TTL: Duration = Duration::from_secs(5);

pub const MSG_ADDED: &str = "Todo added successfully";
pub const MSG_DELETED: &str = "Todo deleted successfully";
pub const MSG_FALLBACK_SENT: &str = "Summary sent to Slack (using basic summary due to API limitations)";
pub const MSG_TITLE_REQUIRED: &str = "Title is required";

pub const ERR_FETCH: &str = "Error fetching todos";
pub const ERR_ADD: &str = "Error adding todo";
pub const ERR_DELETE: &str = "Error deleting todo";
pub const ERR_SUMMARIZE: &str = "Failed to generate summary. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient status line
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    shown_at: Instant,
}

impl StatusMessage {
    fn new(text: impl Into<String>, kind: StatusKind, now: Instant) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: now,
        }
    }

    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= STATUS_TTL
    }
}

/// Which input the form is editing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Description,
}

/// New-todo form
#[derive(Debug, Clone, Default)]
pub struct TodoForm {
    pub title: String,
    pub description: String,
    pub focus: FormField,
}

impl TodoForm {
    pub fn input_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Normal,
    Form,
    Help,
}

/// Work for the runner to perform against the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Refresh,
    Create { title: String, description: String },
    Delete(TodoId),
    Summarize,
}

/// Selection state for the todo list
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub selected_index: usize,
}

impl SelectionState {
    pub fn select_next(&mut self, max_items: usize) {
        if max_items > 0 && self.selected_index < max_items - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn clamp(&mut self, max_items: usize) {
        self.selected_index = self.selected_index.min(max_items.saturating_sub(1));
    }
}

/// Complete TUI state
#[derive(Debug)]
pub struct AppState {
    pub todos: Vec<Todo>,
    pub form: TodoForm,
    pub mode: InteractionMode,
    pub status: Option<StatusMessage>,
    /// A summarize request is in flight
    pub busy: bool,
    pub selection: SelectionState,
    /// Requested work, oldest first; the runner drains it after every event
    pub pending_actions: VecDeque<PendingAction>,
    pub should_quit: bool,
    /// API base URL, shown in the header
    pub api_url: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            todos: Vec::new(),
            form: TodoForm::default(),
            mode: InteractionMode::Normal,
            status: None,
            busy: false,
            selection: SelectionState::default(),
            pending_actions: VecDeque::from([PendingAction::Refresh]),
            should_quit: false,
            api_url: String::new(),
        }
    }

    pub fn push_action(&mut self, action: PendingAction) {
        self.pending_actions.push_back(action);
    }

    pub fn take_action(&mut self) -> Option<PendingAction> {
        self.pending_actions.pop_front()
    }

    pub fn set_todos(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        self.selection.clamp(self.todos.len());
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.todos.get(self.selection.selected_index)
    }

    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.status = Some(StatusMessage::new(msg, StatusKind::Success, Instant::now()));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status = Some(StatusMessage::new(msg, StatusKind::Error, Instant::now()));
    }

    /// Periodic update; drops an expired status message
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| s.expired(now)) {
            self.status = None;
        }
    }

    /// Request a summary unless one is already running
    ///
    /// Returns false when ignored.
    pub fn begin_summarize(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.push_action(PendingAction::Summarize);
        true
    }

    /// Record the summarize result and clear the busy flag
    pub fn finish_summarize(&mut self, result: Result<SummarizeResponse, String>) {
        self.busy = false;
        match result {
            Ok(response) if response.used_fallback == Some(true) => self.set_success(MSG_FALLBACK_SENT),
            Ok(response) => self.set_success(response.message),
            Err(e) => self.set_error(e),
        }
    }
}
