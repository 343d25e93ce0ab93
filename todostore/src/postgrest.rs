//! Hosted backend speaking the PostgREST dialect
//!
//! The managed database exposes each table at `{base}/rest/v1/{table}` and
//! authenticates with the project key in both `apikey` and bearer headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::todo::{NewTodo, Todo, TodoId};
use crate::{StoreError, TABLE, TodoStore};

const LIST_ORDER: &str = "created_at.desc,id.desc";
const PENDING_ORDER: &str = "created_at.asc,id.asc";

/// Bounded retry for idempotent reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled for each one after
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// No retries at all
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::ZERO,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// PostgREST todo store
pub struct PostgrestStore {
    base_url: String,
    api_key: String,
    http: Client,
    retry: RetryPolicy,
}

/// Row body for inserts; `completed` is always sent explicitly
#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    title: &'a str,
    description: Option<&'a str>,
    completed: bool,
}

/// PostgREST error body
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl PostgrestStore {
    /// Create a store for the project at `base_url`
    ///
    /// `timeout` bounds every request, connection included.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(%base_url, ?timeout, ?retry, "PostgrestStore::new: called");
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key: api_key.into(),
            http,
            retry,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    /// Turn a non-success response into a store error carrying the server's message
    async fn api_error(response: Response) -> StoreError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if text.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });

        StoreError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn select_once(&self, query: &[(&str, &str)]) -> Result<Vec<Todo>, StoreError> {
        let response = self
            .authorized(self.http.get(self.table_url()))
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// GET with bounded retry; reads are idempotent so repeating them is safe
    async fn select(&self, query: &[(&str, &str)]) -> Result<Vec<Todo>, StoreError> {
        debug!(?query, "select: called");
        let mut attempt = 0;
        loop {
            match self.select_once(query).await {
                Ok(todos) => return Ok(todos),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let backoff = self.retry.backoff(attempt);
                    warn!(attempt, backoff_ms = backoff.as_millis() as u64, error = %e, "select: retrying");
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl TodoStore for PostgrestStore {
    async fn list(&self) -> Result<Vec<Todo>, StoreError> {
        debug!("list: called");
        self.select(&[("select", "*"), ("order", LIST_ORDER)]).await
    }

    async fn list_pending(&self) -> Result<Vec<Todo>, StoreError> {
        debug!("list_pending: called");
        self.select(&[("select", "*"), ("completed", "eq.false"), ("order", PENDING_ORDER)])
            .await
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        debug!(title = %todo.title, "insert: called");
        let body = [InsertRow {
            title: &todo.title,
            description: todo.description.as_deref(),
            completed: false,
        }];

        let response = self
            .authorized(self.http.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let mut rows: Vec<Todo> = response.json().await?;
        if rows.is_empty() {
            return Err(StoreError::InvalidRecord("insert returned no rows".to_string()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        debug!(%id, "delete: called");
        let filter = format!("eq.{}", id);
        let response = self
            .authorized(self.http.delete(self.table_url()))
            .query(&[("id", filter.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }
}
