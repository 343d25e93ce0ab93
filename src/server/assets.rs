//! Static frontend bundle

use std::path::Path;

use axum::Json;
use axum::http::StatusCode;
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};
use tracing::debug;

/// Files under `dir`; unknown paths get `index.html` so client-side routes load
pub fn bundle(dir: &Path) -> ServeDir<ServeFile> {
    debug!(dir = %dir.display(), "bundle: called");
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

/// Unknown `/api/` paths stay JSON 404s and never fall through to the bundle
pub async fn api_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
