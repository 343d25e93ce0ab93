//! HTTP API server
//!
//! Routes:
//! - `GET /api/todos`, `POST /api/todos`, `DELETE /api/todos/:id`
//! - `POST /api/summarize`
//! - `GET /healthz`
//! - the frontend bundle (tower-http `ServeDir`) as a fallback in production mode

mod assets;
mod error;
pub mod handlers;
mod middleware;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use eyre::{Context, Result};
use todostore::TodoStore;
use tokio::net::TcpListener;
use tracing::{debug, info};

pub use error::ApiError;
pub use handlers::{CreateTodo, NOTHING_TO_SUMMARIZE, SUMMARY_SENT, SummarizeResponse};
pub use middleware::REQUEST_ID_HEADER;

use crate::summary::Summarizer;

/// Shared handles for every request
///
/// Built once at startup; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub summarizer: Summarizer,
    /// Frontend bundle directory; `None` disables static serving
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, summarizer: Summarizer) -> Self {
        Self {
            store,
            summarizer,
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    debug!(static_dir = ?state.static_dir, "build_router: called");
    let api = Router::new()
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route("/todos/:id", delete(handlers::delete_todo))
        .route("/summarize", post(handlers::summarize))
        .fallback(assets::api_not_found);

    let router = Router::new()
        .nest("/api", api)
        .route("/healthz", get(handlers::healthz));

    let router = match &state.static_dir {
        Some(dir) => router.fallback_service(assets::bundle(dir)),
        None => router,
    };

    router
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::request_tracing))
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Server is running on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
