//! Model metadata and reload handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{AppError, AppResult, AppState};

/// GET /model-info: the persisted training record, `{}` without a model
pub async fn info(State(state): State<AppState>) -> AppResult<Json<Value>> {
    match state.model.current() {
        Ok(model) => {
            let value = serde_json::to_value(&model.info)
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            Ok(Json(value))
        }
        Err(_) => Ok(Json(json!({}))),
    }
}

#[derive(Serialize)]
pub struct FeaturesResponse {
    features: Vec<String>,
}

/// GET /features
pub async fn features(State(state): State<AppState>) -> Json<FeaturesResponse> {
    let features = state
        .model
        .current()
        .map(|m| m.feature_names().to_vec())
        .unwrap_or_default();
    Json(FeaturesResponse { features })
}

#[derive(Serialize)]
pub struct ReloadResponse {
    success: bool,
    features_used: usize,
    cv_accuracy_percentage: f64,
}

/// POST /reload: re-read artifacts from the configured directory
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let handle = state.model.clone();
    let dir = state.config.model_dir.clone();

    let model = tokio::task::spawn_blocking(move || handle.reload(&dir))
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .map_err(|e| AppError::ReloadFailed(e.to_string()))?;

    tracing::info!(
        features = model.layout.len(),
        accuracy = model.info.cv_accuracy_percentage,
        "Model reloaded from {}",
        state.config.model_dir.display()
    );

    Ok(Json(ReloadResponse {
        success: true,
        features_used: model.layout.len(),
        cv_accuracy_percentage: model.info.cv_accuracy_percentage,
    }))
}
