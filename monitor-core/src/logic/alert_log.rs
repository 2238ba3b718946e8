//! Alert Log - bounded, newest-first record of detected faults.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

use crate::constants::ALERT_LOG_CAPACITY;
use crate::logic::types::{AcquisitionMode, FaultType};

/// One fault detection. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub id: Uuid,
    pub fault: FaultType,
    pub confidence: f64,
    pub detected_at: DateTime<Utc>,
    pub mode: AcquisitionMode,
}

impl AlertRecord {
    pub fn new(
        fault: FaultType,
        confidence: f64,
        mode: AcquisitionMode,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            fault,
            confidence,
            detected_at,
            mode,
        }
    }

    /// e.g. `SPIKE FAULT [Demo]`
    pub fn title(&self) -> String {
        format!("{} FAULT [{}]", self.fault.as_str().to_uppercase(), self.mode.label())
    }

    pub fn description(&self) -> String {
        format!(
            "Fault detected with {:.2}% confidence. Immediate inspection recommended.",
            self.confidence
        )
    }
}

/// Alert as shown in the alert panel.
#[derive(Debug, Clone, Serialize)]
pub struct AlertView {
    #[serde(flatten)]
    pub record: AlertRecord,
    pub title: String,
    pub description: String,
}

impl From<&AlertRecord> for AlertView {
    fn from(record: &AlertRecord) -> Self {
        Self {
            title: record.title(),
            description: record.description(),
            record: record.clone(),
        }
    }
}

/// Fixed-capacity alert log; iteration yields newest first.
#[derive(Debug)]
pub struct AlertLog {
    entries: VecDeque<AlertRecord>,
    capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_capacity(ALERT_LOG_CAPACITY)
    }
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert at the front; drop the oldest once over capacity.
    pub fn append(&mut self, record: AlertRecord) {
        self.entries.push_front(record);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &AlertRecord> {
        self.entries.iter()
    }

    pub fn views(&self) -> Vec<AlertView> {
        self.entries.iter().map(AlertView::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: i64) -> AlertRecord {
        AlertRecord::new(
            FaultType::Spike,
            n as f64,
            AcquisitionMode::Demo,
            DateTime::from_timestamp(n, 0).unwrap(),
        )
    }

    #[test]
    fn test_sixteenth_append_evicts_first() {
        let mut log = AlertLog::new();
        let records: Vec<AlertRecord> = (0..16).map(record).collect();
        for r in &records {
            log.append(r.clone());
        }

        assert_eq!(log.len(), 15);
        assert_eq!(log.iter().next(), Some(&records[15]));
        assert_eq!(log.iter().last(), Some(&records[1]));
        assert!(log.iter().all(|r| r.id != records[0].id));
    }

    #[test]
    fn test_newest_first_order() {
        let mut log = AlertLog::new();
        for n in 0..5 {
            log.append(record(n));
        }
        let confidences: Vec<f64> = log.iter().map(|r| r.confidence).collect();
        assert_eq!(confidences, vec![4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_clear() {
        let mut log = AlertLog::new();
        log.append(record(1));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_alert_text() {
        let alert = AlertRecord::new(
            FaultType::Plateau,
            97.254,
            AcquisitionMode::Hardware,
            Utc::now(),
        );
        assert_eq!(alert.title(), "PLATEAU FAULT [Hardware]");
        assert_eq!(
            alert.description(),
            "Fault detected with 97.25% confidence. Immediate inspection recommended."
        );
    }
}
