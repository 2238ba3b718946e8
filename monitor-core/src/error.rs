//! Error kinds of the monitoring subsystem.
//!
//! None of these is fatal: acquisition failures fall back to synthetic data,
//! classification failures skip one tick, ingestion failures reject one
//! one-shot request.

use thiserror::Error;

/// Hardware source produced no usable waveform.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AcquisitionError {
    #[error("hardware data unavailable: {0}")]
    Unavailable(String),
}

/// Remote classifier did not return a usable verdict.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassificationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("classifier request timed out")]
    Timeout,

    #[error("classifier returned HTTP {0}")]
    Status(u16),

    /// `success: false` from the classifier; carries its own message.
    #[error("{0}")]
    Rejected(String),

    #[error("malformed classifier response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ClassificationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClassificationError::Timeout
        } else if err.is_decode() {
            ClassificationError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            ClassificationError::Status(status.as_u16())
        } else {
            ClassificationError::Network(err.to_string())
        }
    }
}

/// CSV or manual text could not be turned into a waveform.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum IngestionError {
    #[error("Please provide waveform data first")]
    Empty,

    #[error("Not enough valid data points ({found} found). Minimum {required} points required.")]
    TooFewPoints { found: usize, required: usize },
}

/// Misuse of the monitoring controller, or the loop is gone.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MonitorError {
    #[error("cadence must be a positive number of milliseconds (got {0})")]
    InvalidCadence(u64),

    #[error("monitoring service is not running")]
    Unavailable,
}
