//! Shared domain types: fault categories, acquisition modes and the
//! immutable sample sequence passed through every tick.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// FAULT CATEGORY
// ============================================================================

/// Closed set of classifier output categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultType {
    Normal,
    Spike,
    Plateau,
    Unstable,
}

impl FaultType {
    /// Every category, in display order.
    pub const ALL: [FaultType; 4] = [
        FaultType::Normal,
        FaultType::Spike,
        FaultType::Plateau,
        FaultType::Unstable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaultType::Normal => "normal",
            FaultType::Spike => "spike",
            FaultType::Plateau => "plateau",
            FaultType::Unstable => "unstable",
        }
    }

    pub fn is_fault(&self) -> bool {
        *self != FaultType::Normal
    }
}

impl fmt::Display for FaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(FaultType::Normal),
            "spike" => Ok(FaultType::Spike),
            "plateau" => Ok(FaultType::Plateau),
            "unstable" => Ok(FaultType::Unstable),
            other => Err(format!("unknown fault category: {}", other)),
        }
    }
}

// ============================================================================
// ACQUISITION MODE
// ============================================================================

/// Where sample sequences come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMode {
    #[default]
    Demo,
    Hardware,
}

impl AcquisitionMode {
    /// Label used in alert titles and the mode banner.
    pub fn label(&self) -> &'static str {
        match self {
            AcquisitionMode::Demo => "Demo",
            AcquisitionMode::Hardware => "Hardware",
        }
    }
}

impl FromStr for AcquisitionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" => Ok(AcquisitionMode::Demo),
            "hardware" => Ok(AcquisitionMode::Hardware),
            other => Err(format!("unknown acquisition mode: {}", other)),
        }
    }
}

// ============================================================================
// SAMPLE SEQUENCE
// ============================================================================

/// Ordered resistance measurements for one tick. Cheap to clone, never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSequence(Arc<[f64]>);

impl SampleSequence {
    pub fn new(samples: Vec<f64>) -> Self {
        Self(samples.into())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Deref for SampleSequence {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for SampleSequence {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_type_round_trips_through_text() {
        for fault in FaultType::ALL {
            assert_eq!(fault.as_str().parse::<FaultType>(), Ok(fault));
        }
        assert_eq!(" SPIKE ".parse::<FaultType>(), Ok(FaultType::Spike));
        assert!("arcing".parse::<FaultType>().is_err());
    }

    #[test]
    fn test_only_normal_is_not_a_fault() {
        assert!(!FaultType::Normal.is_fault());
        assert!(FaultType::Spike.is_fault());
        assert!(FaultType::Plateau.is_fault());
        assert!(FaultType::Unstable.is_fault());
    }

    #[test]
    fn test_mode_serde_is_lowercase() {
        let json = serde_json::to_string(&AcquisitionMode::Hardware).unwrap();
        assert_eq!(json, "\"hardware\"");
        let mode: AcquisitionMode = serde_json::from_str("\"demo\"").unwrap();
        assert_eq!(mode, AcquisitionMode::Demo);
    }

    #[test]
    fn test_sample_sequence_serializes_as_plain_array() {
        let seq = SampleSequence::new(vec![1.0, 2.5]);
        assert_eq!(serde_json::to_string(&seq).unwrap(), "[1.0,2.5]");
        assert_eq!(seq.len(), 2);
    }
}
