//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use streetlight_core::EngineError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No trained model is installed
    #[error("Model not available")]
    ModelUnavailable,

    /// Request could not be turned into a decision
    #[error("Rejected request: {0}")]
    BadRequest(String),

    /// Explicit reload could not install a model
    #[error("Model reload failed: {0}")]
    ReloadFailed(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            AppError::ModelUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
            AppError::BadRequest(msg) => {
                tracing::debug!("{}", message);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "success": false, "error": msg })),
                )
                    .into_response()
            }
            AppError::ReloadFailed(msg) => {
                tracing::error!("{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "error": msg })),
                )
                    .into_response()
            }
            AppError::InternalError(_) => {
                tracing::error!("{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        if err.is_model_unavailable() {
            AppError::ModelUnavailable
        } else {
            AppError::BadRequest(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_http_kinds() {
        assert!(matches!(AppError::from(EngineError::ModelUnavailable), AppError::ModelUnavailable));
        let err = AppError::from(EngineError::InvalidInput("Field 'hour' must be a number".to_string()));
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "Rejected request: Field 'hour' must be a number");
    }

    #[test]
    fn test_statuses() {
        assert_eq!(AppError::ModelUnavailable.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::BadRequest("x".into()).into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ReloadFailed("x".into()).into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
