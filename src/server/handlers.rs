//! Route handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use todostore::{NewTodo, Todo, TodoId};
use tracing::{debug, info};

use super::AppState;
use super::error::ApiError;
use crate::summary::SummaryOutcome;

pub const SUMMARY_SENT: &str = "Summary sent to Slack successfully";
pub const NOTHING_TO_SUMMARIZE: &str = "No pending todos to summarize";

/// Body of `POST /api/todos`
#[derive(Debug, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Body of a successful `POST /api/summarize`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummarizeResponse {
    pub message: String,
    #[serde(rename = "usedFallback", skip_serializing_if = "Option::is_none", default)]
    pub used_fallback: Option<bool>,
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    debug!("list_todos: called");
    Ok(Json(state.store.list().await?))
}

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    debug!("create_todo: called");
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let title = body
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;

    let todo = state
        .store
        .insert(NewTodo {
            title,
            description: body.description,
        })
        .await?;
    info!(id = todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<TodoId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|_| ApiError::BadRequest("Invalid todo id".to_string()))?;
    debug!(id, "delete_todo: called");
    state.store.delete(id).await?;
    info!(id, "Todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summarize(State(state): State<AppState>) -> Result<Json<SummarizeResponse>, ApiError> {
    debug!("summarize: called");
    let response = match state.summarizer.run().await? {
        SummaryOutcome::NothingPending => SummarizeResponse {
            message: NOTHING_TO_SUMMARIZE.to_string(),
            used_fallback: None,
        },
        SummaryOutcome::Sent { used_fallback, .. } => SummarizeResponse {
            message: SUMMARY_SENT.to_string(),
            used_fallback: Some(used_fallback),
        },
    };
    Ok(Json(response))
}

pub async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
