//! Decision handler

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;
use streetlight_core::logic::explain::{Conditions, Detail};
use streetlight_core::logic::savings::EnergySavings;
use streetlight_core::{decide, Decision, Observation};

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    success: bool,
    prediction: u8,
    status: &'static str,
    confidence: f64,
    explanation: String,
    details: Vec<Detail>,
    energy_savings: EnergySavings,
    timestamp: String,
    features_used: usize,
    conditions: Conditions,
}

impl From<Decision> for PredictResponse {
    fn from(decision: Decision) -> Self {
        Self {
            success: true,
            prediction: decision.label.as_u8(),
            status: decision.label.status(),
            confidence: decision.confidence,
            explanation: decision.explanation,
            details: decision.details,
            energy_savings: decision.energy_savings,
            timestamp: decision.decided_at.to_rfc3339(),
            features_used: decision.features_used,
            conditions: decision.conditions,
        }
    }
}

/// POST /predict
///
/// Body is parsed here rather than through `Json` so malformed payloads
/// get the same `{success: false, error}` shape as invalid fields.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<PredictResponse>> {
    // Model availability is reported before payload problems
    state.model.current()?;

    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    let observation = Observation::from_json(&payload)?;

    let decision = decide(&state.model, &observation)?;
    tracing::info!(
        status = decision.label.status(),
        confidence = decision.confidence,
        "Prediction served"
    );

    Ok(Json(decision.into()))
}
