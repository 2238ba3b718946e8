//! Health check handler

use axum::{extract::State, Json};
use dcrm_monitor_core::constants::APP_VERSION;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    timestamp: i64,
    monitoring: bool,
    classifier: ClassifierProbe,
}

/// Result of probing `{api_url}/health`. Never fails the check itself.
#[derive(Serialize)]
pub struct ClassifierProbe {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_loaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let classifier = match state.classifier.health_check().await {
        Ok(health) => ClassifierProbe {
            status: "reachable",
            model_loaded: Some(health.model_loaded),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Classifier health probe failed: {}", e);
            ClassifierProbe {
                status: "unreachable",
                model_loaded: None,
                error: Some(e.to_string()),
            }
        }
    };

    let monitoring = match state.monitor.snapshot().await {
        Ok(snapshot) => snapshot.is_running,
        Err(_) => false,
    };

    Json(HealthResponse {
        status: "healthy",
        version: APP_VERSION,
        environment: state.config.environment.clone(),
        timestamp: chrono::Utc::now().timestamp(),
        monitoring,
        classifier,
    })
}
