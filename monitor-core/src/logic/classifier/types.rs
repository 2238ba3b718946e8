//! Verdict types and the classifier's wire format.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::ClassificationError;
use crate::logic::types::FaultType;

// ============================================================================
// DOMAIN
// ============================================================================

/// Confidence per category, in percent. Always holds every category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfidenceMap(BTreeMap<FaultType, f64>);

impl ConfidenceMap {
    /// Build from raw classifier output. Every category must be present
    /// exactly once with a value in [0, 100].
    pub fn from_raw(raw: HashMap<String, f64>) -> Result<Self, ClassificationError> {
        let mut map = BTreeMap::new();

        for (label, value) in raw {
            let fault: FaultType = label.parse().map_err(ClassificationError::Malformed)?;
            if !(0.0..=100.0).contains(&value) {
                return Err(ClassificationError::Malformed(format!(
                    "confidence for {} out of range: {}",
                    fault, value
                )));
            }
            if map.insert(fault, value).is_some() {
                return Err(ClassificationError::Malformed(format!(
                    "duplicate confidence for {}",
                    fault
                )));
            }
        }

        if let Some(missing) = FaultType::ALL.iter().find(|f| !map.contains_key(f)) {
            return Err(ClassificationError::Malformed(format!(
                "confidence missing category {}",
                missing
            )));
        }

        Ok(Self(map))
    }

    pub fn get(&self, fault: FaultType) -> f64 {
        self.0.get(&fault).copied().unwrap_or(0.0)
    }

    /// Highest confidence across categories.
    pub fn max(&self) -> f64 {
        self.0.values().copied().fold(0.0, f64::max)
    }

    /// Entries in category display order.
    pub fn iter(&self) -> impl Iterator<Item = (FaultType, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Scalar descriptors the classifier computed from the waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub num_peaks: u32,
    pub max_peak_height: f64,
    pub mean: f64,
    pub std: f64,
    pub plateau_duration: u32,
    pub max_slope: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_slope: Option<f64>,
}

/// One successful classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub fault: FaultType,
    pub confidence: ConfidenceMap,
    pub features: FeatureSummary,
}

impl Verdict {
    pub fn is_fault(&self) -> bool {
        self.fault.is_fault()
    }

    pub fn max_confidence(&self) -> f64 {
        self.confidence.max()
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub waveform: &'a [f64],
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub predicted_fault: Option<String>,
    #[serde(default)]
    pub confidence: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub features_extracted: Option<FeatureSummary>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PredictResponse {
    /// Convert into a verdict, or the reason there is none.
    pub fn into_verdict(self) -> Result<Verdict, ClassificationError> {
        if !self.success {
            return Err(ClassificationError::Rejected(
                self.error
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            ));
        }

        let label = self
            .predicted_fault
            .ok_or_else(|| ClassificationError::Malformed("missing predicted_fault".to_string()))?;
        let fault: FaultType = label.parse().map_err(ClassificationError::Malformed)?;

        let confidence = ConfidenceMap::from_raw(
            self.confidence
                .ok_or_else(|| ClassificationError::Malformed("missing confidence".to_string()))?,
        )?;

        let features = self.features_extracted.ok_or_else(|| {
            ClassificationError::Malformed("missing features_extracted".to_string())
        })?;

        Ok(Verdict {
            fault,
            confidence,
            features,
        })
    }
}

/// Classifier `/health` payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierHealth {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
}
