//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::features::layout::{layout_hash, FEATURE_VERSION};
use crate::inference::ModelStatus;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    feature_version: u8,
    layout_hash: u32,
    model: ModelStatus,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.model.status();

    Json(HealthResponse {
        status: if model.model_loaded { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        model,
    })
}
