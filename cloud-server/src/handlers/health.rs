//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    /// CV accuracy (%) of the installed model; null without one
    accuracy: Option<f64>,
    version: &'static str,
    timestamp: String,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.model.status();
    Json(HealthResponse {
        status: "healthy",
        model_loaded: status.model_loaded,
        accuracy: status.cv_accuracy_percentage,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
