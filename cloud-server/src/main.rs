//! Streetlight Decision Server
//!
//! HTTP boundary for the lighting decision engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  STREETLIGHT SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │  API      │  │  ModelHandle │  │  Decision pipeline   │  │
//! │  │  (Axum)   │─▶│  (RwLock +   │─▶│  forest → explain →  │  │
//! │  │           │  │   Arc)       │  │  savings             │  │
//! │  └───────────┘  └──────┬───────┘  └──────────────────────┘  │
//! │                        ▼                                    │
//! │                ┌───────────────┐                            │
//! │                │ models/*.json │                            │
//! │                └───────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod handlers;
mod error;


use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use streetlight_core::ModelHandle;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging (core `log` records are bridged into tracing).
    // Production emits JSON lines.
    let production = config.is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "streetlight_server=debug,streetlight_core=info,tower_http=debug".into()))
        .with(production.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!production).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Streetlight server starting ({})...", config.environment);
    tracing::info!("Model directory: {}", config.model_dir.display());

    // Single load attempt; the server still starts without a model
    let model = ModelHandle::load_at_startup(&config.model_dir);
    if !model.is_loaded() {
        tracing::warn!("No model loaded - /predict returns 500 until POST /reload succeeds");
    }

    // Build application state
    let state = AppState {
        model,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: ModelHandle,
    pub config: config::Config,
}

/// Decision routes; mounted at the root and under `/api`
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/model-info", get(handlers::model::info))
        .route("/features", get(handlers::model::features))
        .route("/health", get(handlers::health::check))
        .route("/reload", post(handlers::model::reload))
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
