//! HeartRisk Server
//!
//! Serves heart-disease risk predictions with per-feature explanations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    HEARTRISK SERVER                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────┐    ┌─────────────┐    ┌─────────────────┐  │
//! │  │  API     │    │  Risk       │    │  Attribution    │  │
//! │  │  (Axum)  │───▶│  Engine     │───▶│  (decision      │  │
//! │  └──────────┘    │  (boosted   │    │   path walk)    │  │
//! │                  │   trees)    │    └─────────────────┘  │
//! │                  └──────┬──────┘                         │
//! │                         ▼                                │
//! │                heart_model.json                          │
//! │             (written by `train`)                         │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use heartrisk::app;
use heartrisk::config::Config;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "heartrisk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("HeartRisk server starting ({})...", config.environment);
    tracing::info!("Model artifact: {}", config.model_path.display());

    let port = config.port;
    let state = app::build_state(config);
    let app = app::create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
