//! Central Configuration Constants
//!
//! Single source of truth for all monitoring defaults.
//! To change the default classifier backend, only edit this file.

/// Default classifier / stream backend URL
///
/// This is the fallback URL when no environment variable is set.
/// For development: http://localhost:5000
pub const DEFAULT_API_URL: &str = "https://akhawattushar-intelliwork-backend.hf.space";

/// Default monitoring cadence (milliseconds between ticks)
pub const DEFAULT_CADENCE_MS: u64 = 2_000;

/// Default timeout for a classification request (seconds)
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 10;

/// Default timeout for a hardware stream read (seconds)
pub const DEFAULT_STREAM_TIMEOUT_SECS: u64 = 5;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Waveform shape
// ============================================

/// Samples per synthetic waveform
pub const SYNTHETIC_SAMPLES: usize = 1_000;

/// Time step between synthetic samples
pub const TIME_STEP: f64 = 0.3;

/// Baseline resistance (mOhm) the sinusoid is centered on
pub const BASELINE_CENTER: f64 = 2.5;

/// Baseline sinusoid amplitude
pub const BASELINE_AMPLITUDE: f64 = 0.1;

/// Baseline sinusoid period in time units
pub const BASELINE_PERIOD: f64 = 100.0;

/// Half-width of the uniform noise band added to every sample
pub const NOISE_HALF_WIDTH: f64 = 0.05;

/// Spike: ramp over [300, 320), +0.25 per sample
pub const SPIKE_WINDOW: (usize, usize) = (300, 320);
pub const SPIKE_SLOPE: f64 = 0.25;

/// Plateau: flat offset over [600, 650)
pub const PLATEAU_WINDOW: (usize, usize) = (600, 650);
pub const PLATEAU_OFFSET: f64 = 2.0;

/// Unstable: 8π oscillation over [900, 930)
pub const UNSTABLE_WINDOW: (usize, usize) = (900, 930);
pub const UNSTABLE_AMPLITUDE: f64 = 0.5;

// ============================================
// Display / bookkeeping limits
// ============================================

/// Maximum points drawn on the waveform chart
pub const MAX_DISPLAY_POINTS: usize = 100;

/// Alert log capacity
pub const ALERT_LOG_CAPACITY: usize = 15;

/// Minimum points accepted by CSV / manual ingestion
pub const MIN_INGESTION_POINTS: usize = 10;

// ============================================
// Environment overrides
// ============================================

pub const ENV_API_URL: &str = "DCRM_API_URL";
pub const ENV_CLASSIFIER_TIMEOUT: &str = "CLASSIFIER_TIMEOUT_SECS";
pub const ENV_STREAM_TIMEOUT: &str = "STREAM_TIMEOUT_SECS";
pub const ENV_DEFAULT_CADENCE: &str = "DEFAULT_CADENCE_MS";

/// Backend URL from a raw override, without a trailing slash
pub fn api_url_from(raw: Option<String>) -> String {
    raw.map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Timeout in seconds from a raw override; unparseable values fall back
pub fn timeout_secs_from(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|s| s.parse().ok()).unwrap_or(default)
}

/// Cadence from a raw override. Zero is rejected.
pub fn cadence_ms_from(raw: Option<String>) -> u64 {
    raw.and_then(|s| s.parse().ok())
        .filter(|ms: &u64| *ms > 0)
        .unwrap_or(DEFAULT_CADENCE_MS)
}

/// Get classifier backend URL from environment or use default
pub fn get_api_url() -> String {
    api_url_from(std::env::var(ENV_API_URL).ok())
}

/// Get classifier timeout from environment or use default
pub fn get_classifier_timeout() -> u64 {
    timeout_secs_from(
        std::env::var(ENV_CLASSIFIER_TIMEOUT).ok(),
        DEFAULT_CLASSIFIER_TIMEOUT_SECS,
    )
}

/// Get hardware stream timeout from environment or use default
pub fn get_stream_timeout() -> u64 {
    timeout_secs_from(
        std::env::var(ENV_STREAM_TIMEOUT).ok(),
        DEFAULT_STREAM_TIMEOUT_SECS,
    )
}
