//! TUI Runner - main loop that owns the terminal and talks to the API
//!
//! The TuiRunner is responsible for:
//! - Dispatching events to App for handling
//! - Carrying out pending actions against the API
//! - Running summarize in the background and collecting its result
//! - Rendering at ~30 FPS

use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ApiClient, ClientError};
use crate::server::SummarizeResponse;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{ERR_ADD, ERR_DELETE, ERR_FETCH, ERR_SUMMARIZE, InteractionMode, MSG_ADDED, MSG_DELETED, PendingAction};
use super::views;

type SummaryResult = Result<SummarizeResponse, ClientError>;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    client: ApiClient,
    event_handler: EventHandler,
    summary_tx: mpsc::UnboundedSender<SummaryResult>,
    summary_rx: mpsc::UnboundedReceiver<SummaryResult>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, client: ApiClient) -> Self {
        let (summary_tx, summary_rx) = mpsc::unbounded_channel();
        let mut app = App::new();
        app.state_mut().api_url = client.base_url().to_string();
        Self {
            app,
            terminal,
            client,
            event_handler: EventHandler::new(Duration::from_millis(33)),
            summary_tx,
            summary_rx,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.terminal.draw(|frame| views::render(self.app.state(), frame))?;

            match self.event_handler.next().await? {
                Event::Tick => self.handle_tick().await,
                Event::Key(key) => {
                    if self.app.handle_key(key) {
                        break;
                    }
                    self.run_pending_actions().await;
                }
                Event::Resize(width, height) => debug!(width, height, "run: resize"),
            }

            if self.app.state().should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn handle_tick(&mut self) {
        while let Ok(result) = self.summary_rx.try_recv() {
            debug!(ok = result.is_ok(), "handle_tick: summary finished");
            let result = result.map_err(|e| {
                warn!(error = %e, "Summarize failed");
                e.message_or(ERR_SUMMARIZE)
            });
            self.app.state_mut().finish_summarize(result);
        }

        self.app.state_mut().tick();
        self.run_pending_actions().await;
    }

    async fn run_pending_actions(&mut self) {
        while let Some(action) = self.app.state_mut().take_action() {
            self.run_action(action).await;
        }
    }

    async fn run_action(&mut self, action: PendingAction) {
        debug!(?action, "run_action: called");

        match action {
            PendingAction::Refresh => {
                self.refresh().await;
            }
            PendingAction::Create { title, description } => match self.client.create(&title, &description).await {
                Ok(todo) => {
                    debug!(id = todo.id, "run_action: created");
                    let state = self.app.state_mut();
                    state.form.clear();
                    state.mode = InteractionMode::Normal;
                    if self.refresh().await {
                        self.app.state_mut().set_success(MSG_ADDED);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to add todo");
                    self.app.state_mut().set_error(e.message_or(ERR_ADD));
                }
            },
            PendingAction::Delete(id) => match self.client.delete(id).await {
                Ok(()) => {
                    if self.refresh().await {
                        self.app.state_mut().set_success(MSG_DELETED);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to delete todo");
                    self.app.state_mut().set_error(e.message_or(ERR_DELETE));
                }
            },
            PendingAction::Summarize => {
                let client = self.client.clone();
                let tx = self.summary_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(client.summarize().await);
                });
            }
        }
    }

    /// Refetch the list; returns false (and shows the error) on failure
    async fn refresh(&mut self) -> bool {
        match self.client.list().await {
            Ok(todos) => {
                self.app.state_mut().set_todos(todos);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch todos");
                self.app.state_mut().set_error(e.message_or(ERR_FETCH));
                false
            }
        }
    }
}
