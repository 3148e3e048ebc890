//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use credit_risk_core::ScoringError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request body malformed or outside the input domain
    #[error("{0}")]
    InvalidInput(String),

    /// Input was valid but the preprocessor or model refused it
    #[error("{0}")]
    Unprocessable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::Unprocessable(msg) => {
                tracing::warn!("Scoring failed: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Input(_) => AppError::InvalidInput(err.to_string()),
            ScoringError::Transform(_) | ScoringError::Inference(_) => {
                AppError::Unprocessable(err.to_string())
            }
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}
