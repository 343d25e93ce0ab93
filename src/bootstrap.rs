//! Builds the long-lived clients from configuration

use std::sync::Arc;
use std::time::Duration;

use eyre::{Context, Result};
use todostore::{PostgrestStore, RetryPolicy, SqliteStore, TodoStore};
use tracing::info;

use crate::config::{Config, NotifyConfig, StorageConfig};
use crate::llm::create_client_or_unavailable;
use crate::notify::{Notifier, SlackWebhook};
use crate::server::AppState;
use crate::summary::Summarizer;

/// Hosted backend when a URL is configured, SQLite otherwise
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn TodoStore>> {
    let timeout = Duration::from_millis(config.timeout_ms);
    match (&config.url, &config.api_key) {
        (Some(url), Some(key)) if config.is_hosted() => {
            info!(%url, "Using hosted todo store");
            let retry = RetryPolicy {
                max_retries: config.max_retries,
                initial_backoff: Duration::from_millis(config.retry_backoff_ms),
            };
            let store = PostgrestStore::new(url, key, timeout, retry).context("Failed to create hosted store")?;
            Ok(Arc::new(store))
        }
        _ => {
            info!(path = %config.sqlite_path.display(), "Using SQLite todo store");
            let store = SqliteStore::open(&config.sqlite_path)
                .context(format!("Failed to open {}", config.sqlite_path.display()))?;
            Ok(Arc::new(store))
        }
    }
}

pub fn build_notifier(config: &NotifyConfig) -> Result<Arc<dyn Notifier>> {
    let url = config
        .webhook_url
        .clone()
        .ok_or_else(|| eyre::eyre!("Webhook URL not configured"))?;
    let hook = SlackWebhook::new(url, Duration::from_millis(config.timeout_ms)).context("Failed to create webhook client")?;
    Ok(Arc::new(hook))
}

pub fn build_summarizer(config: &Config, store: Arc<dyn TodoStore>) -> Result<Summarizer> {
    let llm = create_client_or_unavailable(&config.llm);
    let notifier = build_notifier(&config.notify)?;
    Ok(Summarizer::new(store, llm, notifier, config.llm.max_tokens))
}

/// Everything the HTTP server needs
pub fn build_state(config: &Config) -> Result<AppState> {
    let store = build_store(&config.storage)?;
    let summarizer = build_summarizer(config, store.clone())?;
    let state = AppState::new(store, summarizer);
    Ok(if config.server.serves_static() {
        info!(dir = %config.server.static_dir.display(), "Serving frontend bundle");
        state.with_static_dir(&config.server.static_dir)
    } else {
        state
    })
}
