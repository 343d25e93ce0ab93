//! PostgrestStore against an in-process fake of the hosted REST API

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tokio::sync::Mutex;
use todostore::{NewTodo, PostgrestStore, RetryPolicy, StoreError, Todo, TodoStore};

const KEY: &str = "service-key";

#[derive(Default)]
struct Fake {
    rows: Mutex<Vec<Todo>>,
    next_id: AtomicU32,
    /// Number of GET requests to fail with 503 before answering
    failing_reads: AtomicU32,
    get_calls: AtomicU32,
}

type Shared = Arc<Fake>;

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(KEY)
        && headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer service-key")
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"message": "Invalid API key"}))).into_response()
}

async fn select(State(fake): State<Shared>, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    fake.get_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    if fake
        .failing_reads
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        return (StatusCode::SERVICE_UNAVAILABLE, "upstream busy").into_response();
    }

    let mut rows = fake.rows.lock().await.clone();
    if q.get("completed").map(String::as_str) == Some("eq.false") {
        rows.retain(|t| !t.completed);
    }
    match q.get("order").map(String::as_str) {
        Some("created_at.desc,id.desc") => rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id))),
        Some("created_at.asc,id.asc") => rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id))),
        _ => {}
    }
    Json(rows).into_response()
}

async fn insert(State(fake): State<Shared>, headers: HeaderMap, Json(body): Json<Vec<serde_json::Value>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if headers.get("prefer").and_then(|v| v.to_str().ok()) != Some("return=representation") {
        return (StatusCode::CREATED, Json(Vec::<Todo>::new())).into_response();
    }
    let row = &body[0];
    let Some(title) = row["title"].as_str() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "null value in column \"title\" violates not-null constraint"})),
        )
            .into_response();
    };
    let todo = Todo {
        id: i64::from(fake.next_id.fetch_add(1, Ordering::SeqCst) + 1),
        title: title.to_string(),
        description: row["description"].as_str().map(str::to_string),
        completed: row["completed"].as_bool().unwrap_or(true),
        created_at: Utc::now(),
    };
    fake.rows.lock().await.push(todo.clone());
    (StatusCode::CREATED, Json(vec![todo])).into_response()
}

async fn remove(State(fake): State<Shared>, headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let id: Option<i64> = q.get("id").and_then(|f| f.strip_prefix("eq.")).and_then(|n| n.parse().ok());
    if let Some(id) = id {
        fake.rows.lock().await.retain(|t| t.id != id);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_fake(fake: Shared) -> SocketAddr {
    let app = Router::new()
        .route("/rest/v1/todos", get(select).post(insert).delete(remove))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve fake") });
    addr
}

fn store(addr: SocketAddr, key: &str, retry: RetryPolicy) -> PostgrestStore {
    PostgrestStore::new(format!("http://{}/", addr), key, Duration::from_secs(5), retry).expect("build store")
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_insert_list_delete_round_trip() {
    let fake = Shared::default();
    let addr = spawn_fake(fake.clone()).await;
    let store = store(addr, KEY, RetryPolicy::none());

    let milk = store.insert(NewTodo::new("Buy milk", Some("2%"))).await.unwrap();
    let rent = store.insert(NewTodo::new("Pay rent", None)).await.unwrap();
    assert!(!milk.completed);
    assert_eq!(rent.description, None);

    let listed: Vec<_> = store.list().await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(listed, vec![rent.id, milk.id]);

    store.delete(milk.id).await.unwrap();
    store.delete(12345).await.unwrap();

    let listed: Vec<_> = store.list().await.unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(listed, vec![rent.id]);
}

#[tokio::test]
async fn test_list_pending_filters_completed() {
    let fake = Shared::default();
    let addr = spawn_fake(fake.clone()).await;
    let store = store(addr, KEY, RetryPolicy::none());

    let open = store.insert(NewTodo::new("open", None)).await.unwrap();
    let done = store.insert(NewTodo::new("done", None)).await.unwrap();
    for row in fake.rows.lock().await.iter_mut() {
        if row.id == done.id {
            row.completed = true;
        }
    }

    let pending = store.list_pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, open.id);
}

// =============================================================================
// Errors and retry
// =============================================================================

#[tokio::test]
async fn test_error_message_comes_from_response_body() {
    let fake = Shared::default();
    let addr = spawn_fake(fake.clone()).await;
    let store = store(addr, "wrong-key", RetryPolicy::none());

    let err = store.list().await.unwrap_err();
    assert!(matches!(err, StoreError::Api { status: 401, .. }));
    assert_eq!(err.to_string(), "Invalid API key");
}

#[tokio::test]
async fn test_reads_retry_transient_failures() {
    let fake = Shared::default();
    fake.failing_reads.store(2, Ordering::SeqCst);
    let addr = spawn_fake(fake.clone()).await;
    let store = store(
        addr,
        KEY,
        RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::from_millis(1),
        },
    );

    let todos = store.list().await.unwrap();
    assert!(todos.is_empty());
    assert_eq!(fake.get_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_reads_give_up_after_max_retries() {
    let fake = Shared::default();
    fake.failing_reads.store(5, Ordering::SeqCst);
    let addr = spawn_fake(fake.clone()).await;
    let store = store(
        addr,
        KEY,
        RetryPolicy {
            max_retries: 1,
            initial_backoff: Duration::from_millis(1),
        },
    );

    let err = store.list_pending().await.unwrap_err();
    assert!(matches!(err, StoreError::Api { status: 503, .. }));
    assert_eq!(err.to_string(), "upstream busy");
    assert_eq!(fake.get_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = store(addr, KEY, RetryPolicy::none());
    let err = store.insert(NewTodo::new("x", None)).await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
}
