//! One-shot analysis requests

use serde::Deserialize;

use dcrm_monitor_core::FaultType;

/// Pasted comma-separated waveform text
#[derive(Debug, Deserialize)]
pub struct ManualAnalysis {
    #[serde(default)]
    pub data: String,
}

/// Generated test sample of the given shape
#[derive(Debug, Deserialize)]
pub struct TestSampleAnalysis {
    #[serde(default = "default_fault_type")]
    pub fault_type: FaultType,
}

fn default_fault_type() -> FaultType {
    FaultType::Normal
}
