//! Synchronous SQL against the todos table

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Row, params};
use tracing::debug;

use crate::StoreError;
use crate::todo::{NewTodo, Todo, TodoId};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL CHECK (length(title) > 0),
    description TEXT,
    completed   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos (created_at);
CREATE INDEX IF NOT EXISTS idx_todos_completed ON todos (completed);
";

const COLUMNS: &str = "id, title, description, completed, created_at";

/// Create the table and indexes if missing
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    debug!("init_schema: called");
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Timestamps are stored as fixed-width RFC 3339 text so they sort lexically
pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidRecord(format!("bad created_at '{}': {}", raw, e)))
}

struct RawRow {
    id: TodoId,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn into_todo(raw: RawRow) -> Result<Todo, StoreError> {
    Ok(Todo {
        id: raw.id,
        title: raw.title,
        description: raw.description,
        completed: raw.completed,
        created_at: decode_timestamp(&raw.created_at)?,
    })
}

fn query_todos(conn: &Connection, sql: &str) -> Result<Vec<Todo>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], read_row)?;

    let mut todos = Vec::new();
    for raw in rows {
        todos.push(into_todo(raw?)?);
    }
    Ok(todos)
}

pub fn list(conn: &Connection) -> Result<Vec<Todo>, StoreError> {
    debug!("list: called");
    query_todos(
        conn,
        &format!("SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, id DESC"),
    )
}

pub fn list_pending(conn: &Connection) -> Result<Vec<Todo>, StoreError> {
    debug!("list_pending: called");
    query_todos(
        conn,
        &format!("SELECT {COLUMNS} FROM todos WHERE completed = 0 ORDER BY created_at ASC, id ASC"),
    )
}

pub fn insert(conn: &Connection, todo: NewTodo, created_at: DateTime<Utc>) -> Result<Todo, StoreError> {
    debug!(title = %todo.title, "insert: called");
    conn.execute(
        "INSERT INTO todos (title, description, completed, created_at) VALUES (?1, ?2, 0, ?3)",
        params![todo.title, todo.description, encode_timestamp(&created_at)],
    )?;

    Ok(Todo {
        id: conn.last_insert_rowid(),
        title: todo.title,
        description: todo.description,
        completed: false,
        created_at,
    })
}

/// Returns the number of rows removed
pub fn delete(conn: &Connection, id: TodoId) -> Result<usize, StoreError> {
    debug!(%id, "delete: called");
    Ok(conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_timestamp_encoding_sorts_lexically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert!(encode_timestamp(&earlier) < encode_timestamp(&later));
        assert_eq!(encode_timestamp(&later), "2024-01-10T00:00:00.000000Z");
    }

    #[test]
    fn test_timestamp_round_trips_through_row() {
        let conn = conn();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let inserted = insert(&conn, NewTodo::new("Buy milk", Some("2%")), ts).unwrap();

        let listed = list(&conn).unwrap();
        assert_eq!(listed, vec![inserted]);
        assert_eq!(listed[0].created_at, ts);
    }

    #[test]
    fn test_same_timestamp_breaks_ties_by_id() {
        let conn = conn();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let first = insert(&conn, NewTodo::new("first", None), ts).unwrap();
        let second = insert(&conn, NewTodo::new("second", None), ts).unwrap();

        let ids: Vec<_> = list(&conn).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        let pending: Vec<_> = list_pending(&conn).unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(pending, vec![first.id, second.id]);
    }

    #[test]
    fn test_list_pending_skips_completed_rows() {
        let conn = conn();
        let ts = Utc::now();
        let open = insert(&conn, NewTodo::new("open", None), ts).unwrap();
        let done = insert(&conn, NewTodo::new("done", None), ts).unwrap();
        conn.execute("UPDATE todos SET completed = 1 WHERE id = ?1", params![done.id])
            .unwrap();

        let pending = list_pending(&conn).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, open.id);
    }

    #[test]
    fn test_empty_title_rejected_by_schema() {
        let conn = conn();
        let result = insert(&conn, NewTodo::new("", None), Utc::now());
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn test_delete_reports_rows_removed() {
        let conn = conn();
        let todo = insert(&conn, NewTodo::new("gone", None), Utc::now()).unwrap();
        assert_eq!(delete(&conn, todo.id).unwrap(), 1);
        assert_eq!(delete(&conn, todo.id).unwrap(), 0);
    }
}
