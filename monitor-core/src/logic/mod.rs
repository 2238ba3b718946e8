//! Logic Module - monitoring engines
//!
//! - `waveform/` - synthetic generator, hardware stream, per-tick source
//! - `classifier/` - remote classifier client and verdict types
//! - `monitor/` - monitoring loop controller and its service task
//! - `analysis` / `ingest` - one-shot analysis of uploaded data

// Domain types
pub mod types;

// Acquisition & classification
pub mod classifier;
pub mod waveform;

// Presentation state
pub mod alert_log;
pub mod chart;
pub mod fault_state;

// Monitoring loop
pub mod monitor;

// One-shot analysis
pub mod analysis;
pub mod ingest;
