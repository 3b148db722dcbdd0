//! Export endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use crate::export::export_posts;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /posts/export - write every post to the export file, reply in plain text
async fn export(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    let report = export_posts(state.store.as_ref(), &state.export_path)
        .await
        .map_err(ApiError::internal)?;

    Ok(report.message())
}

/// Export routes
///
/// `/posts/export` is a static segment, so it wins over `/posts/{id}`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/posts/export", get(export))
}
