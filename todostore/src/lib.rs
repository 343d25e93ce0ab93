//! TodoStore - persistence for todo records
//!
//! One async [`TodoStore`] trait with two backends:
//!
//! - [`PostgrestStore`] talks to a hosted PostgREST endpoint (the managed
//!   database's REST API). Schema and migrations belong to the hosted service.
//! - [`SqliteStore`] keeps records in an embedded SQLite database owned by a
//!   single actor task. Used for local development and tests.
//!
//! # Example
//!
//! ```ignore
//! use todostore::{NewTodo, SqliteStore, TodoStore};
//!
//! let store = SqliteStore::open_in_memory()?;
//! let todo = store.insert(NewTodo::new("Buy milk", Some("2%"))).await?;
//! let todos = store.list().await?;
//! store.delete(todo.id).await?;
//! ```

use async_trait::async_trait;

mod error;
mod postgrest;
mod sqlite;
mod todo;

pub use error::StoreError;
pub use postgrest::{PostgrestStore, RetryPolicy};
pub use sqlite::SqliteStore;
pub use todo::{NewTodo, Todo, TodoId};

/// Name of the table holding todo records
pub const TABLE: &str = "todos";

/// Persistence operations used by the API layer
///
/// Every call is independent; implementations hold no per-request state.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos, newest first (by `created_at`, ties broken by id)
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// Todos with `completed = false`, oldest first
    async fn list_pending(&self) -> Result<Vec<Todo>, StoreError>;

    /// Insert a todo with `completed = false` and return the stored record
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Delete by id. Deleting an id that does not exist is not an error.
    async fn delete(&self, id: TodoId) -> Result<(), StoreError>;
}
