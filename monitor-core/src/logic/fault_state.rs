//! Fault State Machine - verdict interpretation and session statistics.
//!
//! The only place statistics change and alert records are produced.
//! Never initiates I/O.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::logic::alert_log::AlertRecord;
use crate::logic::classifier::Verdict;
use crate::logic::types::{AcquisitionMode, FaultType};

// ============================================================================
// STATISTICS
// ============================================================================

/// Running scan counters. `total_scans == fault_count + normal_count`
/// always holds because both are only ever bumped together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    total_scans: u64,
    fault_count: u64,
    normal_count: u64,
}

impl Statistics {
    pub fn total_scans(&self) -> u64 {
        self.total_scans
    }

    pub fn fault_count(&self) -> u64 {
        self.fault_count
    }

    pub fn normal_count(&self) -> u64 {
        self.normal_count
    }

    fn record_fault(&mut self) {
        self.fault_count += 1;
        self.total_scans += 1;
    }

    fn record_normal(&mut self) {
        self.normal_count += 1;
        self.total_scans += 1;
    }

    /// Percentage of normal scans; 100 before the first scan.
    pub fn health_rate(&self) -> f64 {
        if self.total_scans == 0 {
            100.0
        } else {
            self.normal_count as f64 / self.total_scans as f64 * 100.0
        }
    }

    pub fn view(&self) -> StatisticsView {
        let health_rate = self.health_rate();
        StatisticsView {
            total_scans: self.total_scans,
            fault_count: self.fault_count,
            normal_count: self.normal_count,
            health_rate,
            health_rate_text: if self.total_scans == 0 {
                "100%".to_string()
            } else {
                format!("{:.1}%", health_rate)
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsView {
    pub total_scans: u64,
    pub fault_count: u64,
    pub normal_count: u64,
    pub health_rate: f64,
    pub health_rate_text: String,
}

// ============================================================================
// DISPLAY
// ============================================================================

/// Breaker indicator state. `Standby` until the first verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakerState {
    #[default]
    Standby,
    Normal,
    Fault,
}

impl BreakerState {
    pub fn text(&self) -> &'static str {
        match self {
            BreakerState::Standby => "STANDBY",
            BreakerState::Normal => "CLOSED - NORMAL",
            BreakerState::Fault => "OPEN - FAULT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBar {
    pub fault: FaultType,
    pub percent: f64,
    pub percent_text: String,
    /// Bar width, clamped to [0, 100]
    pub width: f64,
}

/// One bar per category, in category order.
pub fn confidence_bars(verdict: &Verdict) -> Vec<ConfidenceBar> {
    verdict
        .confidence
        .iter()
        .map(|(fault, percent)| ConfidenceBar {
            fault,
            percent,
            percent_text: format!("{:.2}%", percent),
            width: percent.clamp(0.0, 100.0),
        })
        .collect()
}

/// Everything the indicator widgets show; recomputed from the latest verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayUpdate {
    pub breaker: BreakerState,
    pub breaker_text: &'static str,
    pub fault_active: bool,
    pub headline: String,
    pub confidence_text: String,
    pub confidence_bars: Vec<ConfidenceBar>,
    pub statistics: StatisticsView,
}

impl DisplayUpdate {
    fn derive(latest: Option<&Verdict>, statistics: &Statistics) -> Self {
        let Some(verdict) = latest else {
            return Self {
                breaker: BreakerState::Standby,
                breaker_text: BreakerState::Standby.text(),
                fault_active: false,
                headline: "NO FAULT DETECTED".to_string(),
                confidence_text: "Confidence: --".to_string(),
                confidence_bars: Vec::new(),
                statistics: statistics.view(),
            };
        };

        let breaker = if verdict.is_fault() {
            BreakerState::Fault
        } else {
            BreakerState::Normal
        };

        let headline = if verdict.is_fault() {
            format!("{} FAULT DETECTED", verdict.fault.as_str().to_uppercase())
        } else {
            "NO FAULT DETECTED".to_string()
        };

        Self {
            breaker,
            breaker_text: breaker.text(),
            fault_active: verdict.is_fault(),
            headline,
            confidence_text: format!("Confidence: {:.2}%", verdict.max_confidence()),
            confidence_bars: confidence_bars(verdict),
            statistics: statistics.view(),
        }
    }
}

// ============================================================================
// STATE MACHINE
// ============================================================================

/// Result of applying one verdict.
#[derive(Debug, Clone)]
pub struct Applied {
    pub display: DisplayUpdate,
    pub alert: Option<AlertRecord>,
}

#[derive(Debug, Default)]
pub struct FaultStateMachine {
    statistics: Statistics,
    latest: Option<Verdict>,
}

impl FaultStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one verdict. Faults produce an alert stamped with `mode`
    /// and `now`.
    pub fn apply(
        &mut self,
        verdict: Verdict,
        mode: AcquisitionMode,
        now: DateTime<Utc>,
    ) -> Applied {
        let alert = if verdict.is_fault() {
            self.statistics.record_fault();
            let max_confidence = verdict.max_confidence();
            log::info!(
                "{} fault detected ({:.2}% confidence, {} mode)",
                verdict.fault,
                max_confidence,
                mode.label()
            );
            Some(AlertRecord::new(verdict.fault, max_confidence, mode, now))
        } else {
            self.statistics.record_normal();
            None
        };

        self.latest = Some(verdict);

        Applied {
            display: self.display(),
            alert,
        }
    }

    pub fn state(&self) -> BreakerState {
        match &self.latest {
            None => BreakerState::Standby,
            Some(v) if v.is_fault() => BreakerState::Fault,
            Some(_) => BreakerState::Normal,
        }
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn display(&self) -> DisplayUpdate {
        DisplayUpdate::derive(self.latest.as_ref(), &self.statistics)
    }

    /// Back to standby with zeroed counters.
    pub fn reset(&mut self) {
        self.statistics = Statistics::default();
        self.latest = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::logic::classifier::{ConfidenceMap, FeatureSummary};
    use std::collections::HashMap;

    pub(crate) fn verdict(fault: FaultType, top: f64) -> Verdict {
        let rest = (100.0 - top) / 3.0;
        let raw: HashMap<String, f64> = FaultType::ALL
            .iter()
            .map(|f| (f.to_string(), if *f == fault { top } else { rest }))
            .collect();

        Verdict {
            fault,
            confidence: ConfidenceMap::from_raw(raw).unwrap(),
            features: FeatureSummary {
                num_peaks: 1,
                max_peak_height: 0.9,
                mean: 0.4,
                std: 0.1,
                plateau_duration: 12,
                max_slope: 0.05,
                min_slope: None,
            },
        }
    }

    #[test]
    fn test_initial_state_is_standby() {
        let fsm = FaultStateMachine::new();
        let display = fsm.display();
        assert_eq!(fsm.state(), BreakerState::Standby);
        assert_eq!(display.breaker_text, "STANDBY");
        assert_eq!(display.confidence_text, "Confidence: --");
        assert_eq!(display.statistics.health_rate_text, "100%");
        assert!(display.confidence_bars.is_empty());
    }

    #[test]
    fn test_fault_verdict_counts_and_alerts() {
        let mut fsm = FaultStateMachine::new();
        let applied = fsm.apply(verdict(FaultType::Spike, 91.5), AcquisitionMode::Demo, Utc::now());

        assert_eq!(fsm.statistics().fault_count(), 1);
        assert_eq!(fsm.statistics().normal_count(), 0);
        assert_eq!(fsm.statistics().total_scans(), 1);
        assert_eq!(fsm.state(), BreakerState::Fault);

        let alert = applied.alert.expect("fault must emit an alert");
        assert_eq!(alert.fault, FaultType::Spike);
        assert_eq!(alert.confidence, 91.5);
        assert_eq!(alert.mode, AcquisitionMode::Demo);

        assert_eq!(applied.display.headline, "SPIKE FAULT DETECTED");
        assert_eq!(applied.display.breaker_text, "OPEN - FAULT");
        assert_eq!(applied.display.confidence_text, "Confidence: 91.50%");
        assert!(applied.display.fault_active);
        assert_eq!(applied.display.confidence_bars.len(), 4);
    }

    #[test]
    fn test_normal_verdict_counts_without_alert() {
        let mut fsm = FaultStateMachine::new();
        let applied = fsm.apply(
            verdict(FaultType::Normal, 88.0),
            AcquisitionMode::Hardware,
            Utc::now(),
        );

        assert!(applied.alert.is_none());
        assert_eq!(fsm.statistics().normal_count(), 1);
        assert_eq!(fsm.statistics().fault_count(), 0);
        assert_eq!(fsm.state(), BreakerState::Normal);
        assert_eq!(applied.display.headline, "NO FAULT DETECTED");
        assert_eq!(applied.display.breaker_text, "CLOSED - NORMAL");
    }

    #[test]
    fn test_total_is_sum_after_mixed_sequence() {
        let mut fsm = FaultStateMachine::new();
        let labels = [
            FaultType::Normal,
            FaultType::Plateau,
            FaultType::Normal,
            FaultType::Unstable,
            FaultType::Normal,
            FaultType::Spike,
            FaultType::Normal,
            FaultType::Normal,
        ];
        for label in labels {
            fsm.apply(verdict(label, 70.0), AcquisitionMode::Demo, Utc::now());
            let stats = fsm.statistics();
            assert_eq!(stats.total_scans(), stats.fault_count() + stats.normal_count());
        }

        let view = fsm.statistics().view();
        assert_eq!(view.total_scans, 8);
        assert_eq!(view.fault_count, 3);
        assert_eq!(view.health_rate, 62.5);
        assert_eq!(view.health_rate_text, "62.5%");
    }

    #[test]
    fn test_state_follows_latest_verdict() {
        let mut fsm = FaultStateMachine::new();
        fsm.apply(verdict(FaultType::Plateau, 70.0), AcquisitionMode::Demo, Utc::now());
        assert_eq!(fsm.state(), BreakerState::Fault);
        fsm.apply(verdict(FaultType::Normal, 70.0), AcquisitionMode::Demo, Utc::now());
        assert_eq!(fsm.state(), BreakerState::Normal);
    }

    #[test]
    fn test_reset_returns_to_standby() {
        let mut fsm = FaultStateMachine::new();
        fsm.apply(verdict(FaultType::Spike, 70.0), AcquisitionMode::Demo, Utc::now());
        fsm.reset();
        assert_eq!(fsm.state(), BreakerState::Standby);
        assert_eq!(*fsm.statistics(), Statistics::default());
    }
}
