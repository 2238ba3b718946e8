//! Hardware stream client (hardware mode).
//!
//! Reads the latest sensor waveform from `GET {base_url}/stream`. Any
//! failure comes back as `AcquisitionError::Unavailable`; the waveform
//! source decides what to substitute.

use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::constants;
use crate::error::AcquisitionError;
use crate::logic::types::SampleSequence;

/// A source of real sensor waveforms.
pub trait HardwareFeed: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<SampleSequence, AcquisitionError>> + Send;
}

/// Stream endpoint configuration
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_api_url(),
            timeout: Duration::from_secs(constants::get_stream_timeout()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    waveform: Option<Vec<f64>>,
}

/// HTTP client for the sensor stream endpoint
#[derive(Debug, Clone)]
pub struct StreamClient {
    config: StreamConfig,
    http_client: reqwest::Client,
}

impl StreamClient {
    pub fn new(config: StreamConfig) -> Result<Self, AcquisitionError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AcquisitionError::Unavailable(format!("http client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    async fn read_stream(&self) -> Result<SampleSequence, AcquisitionError> {
        let url = format!("{}/stream", self.config.base_url);

        let response = self
            .http_client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AcquisitionError::Unavailable("stream request timed out".to_string())
                } else {
                    AcquisitionError::Unavailable(format!("network error: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(AcquisitionError::Unavailable(format!(
                "stream returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: StreamResponse = response
            .json()
            .await
            .map_err(|e| AcquisitionError::Unavailable(format!("parse error: {}", e)))?;

        match body.waveform {
            Some(waveform) if body.success && !waveform.is_empty() => {
                log::debug!("Hardware data received ({} samples)", waveform.len());
                Ok(SampleSequence::new(waveform))
            }
            _ => Err(AcquisitionError::Unavailable(
                "no waveform data in response".to_string(),
            )),
        }
    }
}

impl HardwareFeed for StreamClient {
    async fn fetch(&self) -> Result<SampleSequence, AcquisitionError> {
        self.read_stream().await
    }
}
