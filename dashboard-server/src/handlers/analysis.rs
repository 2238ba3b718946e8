//! One-shot analysis handlers
//!
//! Independent of the monitoring session: nothing here changes statistics
//! or alerts.

use axum::{extract::State, Json};

use dcrm_monitor_core::logic::analysis::{self, AnalysisReport};
use dcrm_monitor_core::logic::ingest;

use crate::models::{ManualAnalysis, TestSampleAnalysis};
use crate::{AppResult, AppState};

/// Analyze pasted comma-separated values
pub async fn manual(
    State(state): State<AppState>,
    Json(req): Json<ManualAnalysis>,
) -> AppResult<Json<AnalysisReport>> {
    let samples = ingest::parse_manual(&req.data)?;
    run(&state, &samples).await
}

/// Analyze an uploaded CSV file sent as the raw request body
pub async fn csv(State(state): State<AppState>, body: String) -> AppResult<Json<AnalysisReport>> {
    let samples = ingest::parse_csv(&body)?;
    run(&state, &samples).await
}

/// Analyze a generated waveform of the requested shape
pub async fn test_sample(
    State(state): State<AppState>,
    Json(req): Json<TestSampleAnalysis>,
) -> AppResult<Json<AnalysisReport>> {
    let samples = analysis::generate_test_sample(req.fault_type);
    run(&state, &samples).await
}

async fn run(state: &AppState, samples: &[f64]) -> AppResult<Json<AnalysisReport>> {
    let report = analysis::analyze(state.classifier.as_ref(), samples).await?;
    tracing::info!(
        "Analysis complete: {} ({} samples)",
        report.badge,
        report.sample_count
    );
    Ok(Json(report))
}
