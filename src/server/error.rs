//! HTTP error mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use todostore::StoreError;
use tracing::error;

use crate::summary::SummarizeError;

/// Errors returned by the API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected at the boundary before touching the store
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Summarize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(message) => json!({ "error": message }),
            ApiError::Store(e) => {
                error!(error = %e, "Store request failed");
                json!({ "error": e.to_string() })
            }
            ApiError::Summarize(e) => {
                error!(error = %e, "Summarize failed");
                json!({ "error": e.to_string(), "details": e.details() })
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_shape() {
        let response = ApiError::BadRequest("Title is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Title is required"}));
    }

    #[tokio::test]
    async fn test_store_error_surfaces_message() {
        let err = StoreError::Api {
            status: 401,
            message: "Invalid API key".to_string(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"error": "Invalid API key"}));
    }

    #[tokio::test]
    async fn test_summarize_error_includes_details() {
        let err = SummarizeError::Notify(NotifyError::Rejected {
            status: 404,
            body: "no_service".to_string(),
        });
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Webhook request failed with status code 404", "details": "no_service"})
        );
    }

    #[tokio::test]
    async fn test_summarize_error_without_details_is_null() {
        let err = SummarizeError::Store(StoreError::ChannelClosed);
        let body = body_json(ApiError::from(err).into_response()).await;
        assert_eq!(body, json!({"error": "Store is not running", "details": null}));
    }
}
