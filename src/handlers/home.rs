//! Root page handler

use axum::extract::State;
use axum::response::Html;

use crate::app::AppState;
use crate::{AppError, AppResult};

/// Serve the static demo page.
pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = tokio::fs::read_to_string(&state.config.index_path)
        .await
        .map_err(|e| AppError::NotFound(format!("index page unavailable: {e}")))?;
    Ok(Html(page))
}
