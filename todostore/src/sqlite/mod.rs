//! SqliteStore - actor that owns the SQLite connection
//!
//! Processes commands via channels so the connection is only ever touched
//! from one task.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::Connection;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::todo::{NewTodo, Todo, TodoId};
use crate::{StoreError, TodoStore};

mod db;
mod messages;

use messages::{StoreCommand, StoreResponse};

/// Handle to send commands to the SQLite actor
#[derive(Clone)]
pub struct SqliteStore {
    tx: mpsc::Sender<StoreCommand>,
}

impl SqliteStore {
    /// Open (or create) a database file and spawn the actor
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        debug!(path = %path.as_ref().display(), "open: called");
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Opened SQLite todo store");
        Self::spawn(conn)
    }

    /// Open a private in-memory database and spawn the actor
    pub fn open_in_memory() -> Result<Self, StoreError> {
        debug!("open_in_memory: called");
        Self::spawn(Connection::open_in_memory()?)
    }

    fn spawn(conn: Connection) -> Result<Self, StoreError> {
        db::init_schema(&conn)?;

        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(conn, rx));

        debug!("SqliteStore actor spawned");
        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<StoreResponse<T>>) -> StoreCommand,
    ) -> StoreResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| StoreError::ChannelClosed)?;
        reply_rx.await.map_err(|_| StoreError::ChannelClosed)?
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        debug!("list: called");
        self.request(|reply| StoreCommand::List { reply }).await
    }

    async fn list_pending(&self) -> Result<Vec<Todo>, StoreError> {
        debug!("list_pending: called");
        self.request(|reply| StoreCommand::ListPending { reply }).await
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        debug!(title = %todo.title, "insert: called");
        self.request(|reply| StoreCommand::Insert { todo, reply }).await
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        debug!(%id, "delete: called");
        self.request(|reply| StoreCommand::Delete { id, reply }).await
    }
}

/// Creation timestamps never go backwards, even if the wall clock does.
/// Truncated to the microsecond precision the table stores.
fn next_created_at(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now().trunc_subsecs(6);
    match last {
        Some(last) if last > now => last,
        _ => now,
    }
}

async fn actor_loop(conn: Connection, mut rx: mpsc::Receiver<StoreCommand>) {
    debug!("actor_loop: called");
    let mut last_created: Option<DateTime<Utc>> = None;

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StoreCommand::List { reply } => {
                debug!("actor_loop: List command");
                let _ = reply.send(db::list(&conn));
            }

            StoreCommand::ListPending { reply } => {
                debug!("actor_loop: ListPending command");
                let _ = reply.send(db::list_pending(&conn));
            }

            StoreCommand::Insert { todo, reply } => {
                debug!(title = %todo.title, "actor_loop: Insert command");
                let created_at = next_created_at(last_created);
                let result = db::insert(&conn, todo, created_at);
                if result.is_ok() {
                    last_created = Some(created_at);
                }
                let _ = reply.send(result);
            }

            StoreCommand::Delete { id, reply } => {
                debug!(%id, "actor_loop: Delete command");
                let result = db::delete(&conn, id).map(|removed| {
                    debug!(%id, removed, "actor_loop: Delete finished");
                });
                let _ = reply.send(result);
            }
        }
    }

    debug!("SqliteStore actor stopped");
}
