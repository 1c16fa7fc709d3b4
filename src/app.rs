//! Application state and router assembly.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers;
use crate::model::RiskEngine;

/// Shared application state. Built once before serving, read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the model failed to load at startup. The server keeps
    /// running in that state and predictions fail with a server error.
    pub engine: Option<Arc<RiskEngine>>,
    pub config: Config,
}

/// Load the model and assemble the application state. A load failure is
/// logged, not fatal: the process serves in a broken state until restarted.
pub fn build_state(config: Config) -> AppState {
    let engine = match RiskEngine::load(&config.model_path) {
        Ok(engine) => Some(Arc::new(engine)),
        Err(e) => {
            tracing::error!(
                "CRITICAL: could not load model from {}: {}",
                config.model_path.display(),
                e
            );
            None
        }
    };
    AppState { engine, config }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home::index))
        .route("/health", get(handlers::health::check))
        .route("/predict_risk", post(handlers::predict::predict_risk))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
