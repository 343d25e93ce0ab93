//! TUI application - key handling
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InteractionMode, MSG_TITLE_REQUIRED, PendingAction};

/// TUI application
#[derive(Debug, Default)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self { state: AppState::new() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match self.state.mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Form => self.handle_form_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }
        self.state.should_quit
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('?') => self.state.mode = InteractionMode::Help,

            KeyCode::Up | KeyCode::Char('k') => self.state.selection.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.state.todos.len();
                self.state.selection.select_next(max);
            }

            KeyCode::Char('a') => self.state.mode = InteractionMode::Form,
            KeyCode::Char('d') => {
                if let Some(id) = self.state.selected_todo().map(|t| t.id) {
                    self.state.push_action(PendingAction::Delete(id));
                }
            }
            KeyCode::Char('s') => {
                self.state.begin_summarize();
            }
            KeyCode::Char('r') => self.state.push_action(PendingAction::Refresh),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.form.clear();
                self.state.mode = InteractionMode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => self.state.form.toggle_focus(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => {
                self.state.form.input_mut().pop();
            }
            KeyCode::Char(c) => self.state.form.input_mut().push(c),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            self.state.mode = InteractionMode::Normal;
        }
    }

    /// Queue a create; the form is cleared by the runner once the server accepts it
    fn submit_form(&mut self) {
        let title = self.state.form.title.trim();
        if title.is_empty() {
            self.state.set_error(MSG_TITLE_REQUIRED);
            return;
        }
        let action = PendingAction::Create {
            title: title.to_string(),
            description: self.state.form.description.trim().to_string(),
        };
        self.state.push_action(action);
    }
}
