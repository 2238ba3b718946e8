//! DCRM Monitor Core
//!
//! Continuous breaker monitoring: acquire a DCRM waveform, classify it with
//! the remote model, and keep the dashboard's indicator, statistics, chart
//! and alert state. Also runs one-shot analyses of uploaded waveforms.

pub mod constants;
pub mod error;
pub mod logic;

#[cfg(test)]
mod test_support;

pub use error::{AcquisitionError, ClassificationError, IngestionError, MonitorError};
pub use logic::classifier::{Classifier, ClassifierClient, ClassifierConfig, Verdict};
pub use logic::monitor::{DashboardSnapshot, MonitorHandle, MonitorService, MonitorSettings};
pub use logic::types::{AcquisitionMode, FaultType, SampleSequence};
pub use logic::waveform::{SimulationType, StreamClient, StreamConfig, WaveformSource};
