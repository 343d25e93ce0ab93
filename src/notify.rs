//! Chat webhook notifications

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while delivering a notification
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook request failed with status code {status}")]
    Rejected { status: u16, body: String },

    #[error("Webhook request failed: {0}")]
    Network(#[from] reqwest::Error),
}

impl NotifyError {
    /// Diagnostic detail for API responses: the webhook's response body, or
    /// the transport cause
    pub fn details(&self) -> Option<String> {
        match self {
            NotifyError::Rejected { body, .. } if !body.is_empty() => Some(body.clone()),
            NotifyError::Rejected { .. } => None,
            NotifyError::Network(e) => Some(e.to_string()),
        }
    }
}

/// Delivers a text message to a chat channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Slack-style incoming webhook: POST `{"text": ...}`, any 2xx is success
pub struct SlackWebhook {
    url: String,
    http: Client,
}

impl SlackWebhook {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { url: url.into(), http })
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        debug!(len = text.len(), "SlackWebhook::send: called");
        let response = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), %body, "SlackWebhook::send: rejected");
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Notification delivered");
        Ok(())
    }
}
