//! Classifier Client
//!
//! HTTP client for the remote fault classifier. One request per call, no
//! retries; every failure is surfaced as `ClassificationError`.

use std::future::Future;
use std::time::Duration;

use super::types::{ClassifierHealth, PredictRequest, PredictResponse, Verdict};
use crate::constants;
use crate::error::ClassificationError;

/// Anything that can turn a waveform into a verdict.
pub trait Classifier: Send + Sync + 'static {
    fn classify(
        &self,
        samples: &[f64],
    ) -> impl Future<Output = Result<Verdict, ClassificationError>> + Send;
}

/// Classifier endpoint configuration
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_api_url(),
            timeout: Duration::from_secs(constants::get_classifier_timeout()),
        }
    }
}

/// Remote classifier API client
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    config: ClassifierConfig,
    http_client: reqwest::Client,
}

impl ClassifierClient {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassificationError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassificationError::Network(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// `POST {base_url}/predict`
    pub async fn predict(&self, samples: &[f64]) -> Result<Verdict, ClassificationError> {
        let url = format!("{}/predict", self.config.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&PredictRequest { waveform: samples })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies may still carry the classifier's message.
            let text = response.text().await.unwrap_or_default();
            return match serde_json::from_str::<PredictResponse>(&text) {
                Ok(body) if body.error.is_some() => Err(ClassificationError::Rejected(
                    body.error.unwrap_or_default(),
                )),
                _ => Err(ClassificationError::Status(status.as_u16())),
            };
        }

        let body: PredictResponse = response.json().await?;
        body.into_verdict()
    }

    /// `GET {base_url}/health`
    pub async fn health_check(&self) -> Result<ClassifierHealth, ClassificationError> {
        let url = format!("{}/health", self.config.base_url);

        let response = self.http_client.get(&url).send().await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(ClassificationError::Status(response.status().as_u16()))
        }
    }
}

impl Classifier for ClassifierClient {
    async fn classify(&self, samples: &[f64]) -> Result<Verdict, ClassificationError> {
        self.predict(samples).await
    }
}
