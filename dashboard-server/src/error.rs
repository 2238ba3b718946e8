//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use dcrm_monitor_core::logic::analysis::failure_message;
use dcrm_monitor_core::{ClassificationError, IngestionError, MonitorError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Request errors
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    // Monitoring loop errors
    #[error(transparent)]
    Monitor(#[from] MonitorError),

    // External service errors
    #[error(transparent)]
    Classification(#[from] ClassificationError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Ingestion(_) => StatusCode::BAD_REQUEST,
            AppError::Monitor(MonitorError::InvalidCadence(_)) => StatusCode::BAD_REQUEST,
            AppError::Monitor(MonitorError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Classification(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Classification(err) => {
                tracing::warn!("Classifier error: {}", err);
                failure_message(err)
            }
            AppError::Monitor(MonitorError::Unavailable) => {
                tracing::error!("Monitoring service is gone");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
