//! SQLite actor messages
//!
//! Commands and replies for the actor that owns the connection.

use tokio::sync::oneshot;

use crate::StoreError;
use crate::todo::{NewTodo, Todo, TodoId};

/// Reply from the actor
pub type StoreResponse<T> = Result<T, StoreError>;

/// Commands sent to the SQLite actor
#[derive(Debug)]
pub enum StoreCommand {
    List {
        reply: oneshot::Sender<StoreResponse<Vec<Todo>>>,
    },
    ListPending {
        reply: oneshot::Sender<StoreResponse<Vec<Todo>>>,
    },
    Insert {
        todo: NewTodo,
        reply: oneshot::Sender<StoreResponse<Todo>>,
    },
    Delete {
        id: TodoId,
        reply: oneshot::Sender<StoreResponse<()>>,
    },
}
