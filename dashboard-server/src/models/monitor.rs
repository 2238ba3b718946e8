//! Monitoring control requests

use serde::Deserialize;
use validator::Validate;

use dcrm_monitor_core::{AcquisitionMode, SimulationType};

/// Start request; omitted fields keep the current settings.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct StartMonitor {
    #[validate(range(min = 100, max = 60000))]
    pub cadence_ms: Option<u64>,
    pub mode: Option<AcquisitionMode>,
}

/// Cadence change, 100ms to 60s.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCadence {
    #[validate(range(min = 100, max = 60000))]
    pub cadence_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMode {
    pub mode: AcquisitionMode,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSimulation {
    pub simulation: SimulationType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_bounds() {
        assert!(UpdateCadence { cadence_ms: 100 }.validate().is_ok());
        assert!(UpdateCadence { cadence_ms: 60_000 }.validate().is_ok());
        assert!(UpdateCadence { cadence_ms: 99 }.validate().is_err());
        assert!(UpdateCadence { cadence_ms: 60_001 }.validate().is_err());
    }

    #[test]
    fn test_start_fields_are_optional() {
        let req: StartMonitor = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());
        assert!(req.cadence_ms.is_none());

        let req: StartMonitor =
            serde_json::from_str(r#"{"cadence_ms": 50, "mode": "hardware"}"#).unwrap();
        assert_eq!(req.mode, Some(AcquisitionMode::Hardware));
        assert!(req.validate().is_err());
    }
}
