//! Monitoring control handlers
//!
//! Every route forwards one command to the monitoring service and replies
//! with the resulting dashboard snapshot.

use axum::{extract::State, Json};
use validator::Validate;

use dcrm_monitor_core::DashboardSnapshot;

use crate::models::{StartMonitor, UpdateCadence, UpdateMode, UpdateSimulation};
use crate::{AppResult, AppState};

/// Current dashboard state
pub async fn snapshot(State(state): State<AppState>) -> AppResult<Json<DashboardSnapshot>> {
    Ok(Json(state.monitor.snapshot().await?))
}

/// Start monitoring. The body is optional.
pub async fn start(
    State(state): State<AppState>,
    body: Option<Json<StartMonitor>>,
) -> AppResult<Json<DashboardSnapshot>> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()?;

    let snapshot = state.monitor.start(req.cadence_ms, req.mode).await?;
    tracing::info!(
        "Monitoring started: {} every {}ms",
        snapshot.settings.mode.label(),
        snapshot.settings.cadence_ms
    );
    Ok(Json(snapshot))
}

pub async fn stop(State(state): State<AppState>) -> AppResult<Json<DashboardSnapshot>> {
    let snapshot = state.monitor.stop().await?;
    tracing::info!("Monitoring stopped after {}", snapshot.uptime);
    Ok(Json(snapshot))
}

pub async fn toggle(State(state): State<AppState>) -> AppResult<Json<DashboardSnapshot>> {
    Ok(Json(state.monitor.toggle().await?))
}

/// Stop and clear statistics, alerts and chart
pub async fn reset(State(state): State<AppState>) -> AppResult<Json<DashboardSnapshot>> {
    let snapshot = state.monitor.reset().await?;
    tracing::info!("Monitoring session reset");
    Ok(Json(snapshot))
}

pub async fn set_cadence(
    State(state): State<AppState>,
    Json(req): Json<UpdateCadence>,
) -> AppResult<Json<DashboardSnapshot>> {
    req.validate()?;
    Ok(Json(state.monitor.set_cadence(req.cadence_ms).await?))
}

pub async fn set_mode(
    State(state): State<AppState>,
    Json(req): Json<UpdateMode>,
) -> AppResult<Json<DashboardSnapshot>> {
    Ok(Json(state.monitor.set_mode(req.mode).await?))
}

/// Demo waveform shape; takes effect from the next tick
pub async fn set_simulation(
    State(state): State<AppState>,
    Json(req): Json<UpdateSimulation>,
) -> AppResult<Json<DashboardSnapshot>> {
    Ok(Json(state.monitor.set_simulation(req.simulation).await?))
}
