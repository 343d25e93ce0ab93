//! HTTP client for the todo API, used by the terminal UI

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use thiserror::Error;
use todostore::{Todo, TodoId};
use tracing::debug;

use crate::server::SummarizeResponse;

/// Errors from API calls
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("Server returned {status}")]
    Status { status: u16, error: Option<String> },

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Text for the status line: the server's `error` field, else `fallback`
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Status { error: Some(e), .. } if !e.is_empty() => e.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for a running todo-summary server
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let error = response.json::<ErrorBody>().await.ok().and_then(|b| b.error);
        debug!(status = status.as_u16(), ?error, "check: server error");
        Err(ClientError::Status {
            status: status.as_u16(),
            error,
        })
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ClientError> {
        debug!("ApiClient::list: called");
        let response = self.http.get(self.url("/api/todos")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create(&self, title: &str, description: &str) -> Result<Todo, ClientError> {
        debug!(%title, "ApiClient::create: called");
        let response = self
            .http
            .post(self.url("/api/todos"))
            .json(&serde_json::json!({ "title": title, "description": description }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), ClientError> {
        debug!(id, "ApiClient::delete: called");
        let response = self.http.delete(self.url(&format!("/api/todos/{}", id))).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn summarize(&self) -> Result<SummarizeResponse, ClientError> {
        debug!("ApiClient::summarize: called");
        let response = self.http.post(self.url("/api/summarize")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
