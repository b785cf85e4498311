//! Prediction handler

use axum::{body::Bytes, extract::State, Json};

use crate::{AppState, AppError, AppResult};
use crate::features;
use crate::models::{EmployeeRecord, Payload, PredictionResponse};

/// Validate the submitted record, build its feature row and ask the model.
///
/// The body is read as raw bytes so form scripts that post JSON without a
/// JSON content type are still accepted.
pub async fn post_result(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<PredictionResponse>> {
    let payload: Payload = serde_json::from_slice(&body)
        .map_err(|e| AppError::MalformedBody(format!("Invalid JSON body: {}", e)))?;

    let record = EmployeeRecord::from_payload(&payload).map_err(|e| {
        tracing::warn!(field = e.field, "Rejected record");
        e
    })?;

    let row = features::build_row(&record);
    tracing::debug!(features = %row.to_log_entry(), "Feature row built");
    let attrition_risk = row.get_by_name("AttritionRisk");

    let model = state.model.clone();
    let prediction = tokio::task::spawn_blocking(move || model.predict(&row)).await??;

    tracing::info!(prediction, ?attrition_risk, "Prediction served");

    Ok(Json(PredictionResponse { prediction }))
}
