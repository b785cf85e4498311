//! Attrition Prediction Service
//!
//! Accepts employee attributes from the prediction form, turns them into the
//! feature row the classifier was trained on and returns the predicted
//! attrition label.
//!
//! # Architecture
//!
//! ```text
//! POST /result/ ─▶ validate ─▶ feature transform ─▶ ModelStore ─▶ {"prediction": 0|1}
//!                  (models)     (features)           (inference, ONNX)
//! ```

mod config;
mod error;
mod features;
mod handlers;
mod inference;
mod models;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
    services::ServeDir,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::inference::ModelStore;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Attrition prediction service starting ({})...", config.environment);
    tracing::info!(
        "Feature layout v{} ({} features, hash {:08x})",
        features::layout::FEATURE_VERSION,
        features::FEATURE_COUNT,
        features::layout::layout_hash()
    );

    // Load the model up front; requests retry the load if this fails
    let model = Arc::new(ModelStore::onnx(&config.model_path));
    if let Err(e) = model.preload() {
        tracing::warn!("Model not loaded at startup: {}", e);
    }

    let addr = config.addr();
    let state = AppState { config, model };
    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &config::Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "attrition_predict=debug,tower_http=debug".into());

    if config.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub model: Arc<ModelStore>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let static_url = state.config.static_url.clone();
    let static_files = ServeDir::new(&state.config.static_root);

    Router::new()
        // Pages
        .route("/", get(handlers::pages::prediction_html))
        .route("/about/", get(handlers::pages::about_html))
        .route("/about", get(handlers::pages::about_html))

        // Prediction
        .route("/result/", post(handlers::prediction::post_result))
        .route("/result", post(handlers::prediction::post_result))

        // Service
        .route("/health", get(handlers::health::check))
        .route("/api/v1/model/layout", get(handlers::model::layout))

        .nest_service(&static_url, static_files)
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
