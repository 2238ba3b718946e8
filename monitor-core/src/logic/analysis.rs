//! One-shot analysis: classify a single waveform outside the monitoring
//! session. Nothing here touches statistics or the alert log.

use serde::Serialize;

use crate::error::ClassificationError;
use crate::logic::chart::{downsample, ChartData, RenderStyle};
use crate::logic::classifier::{Classifier, FeatureSummary, Verdict};
use crate::logic::fault_state::{confidence_bars, ConfidenceBar};
use crate::logic::types::{FaultType, SampleSequence};
use crate::logic::waveform::Synthesizer;

/// One labelled feature tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTile {
    pub name: &'static str,
    pub value: String,
}

/// Result panel for a successful analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub fault: FaultType,
    /// Upper-cased label, e.g. `SPIKE`
    pub badge: String,
    pub is_fault: bool,
    pub confidence_bars: Vec<ConfidenceBar>,
    pub features: FeatureSummary,
    pub feature_tiles: Vec<FeatureTile>,
    pub chart: ChartData,
    pub sample_count: usize,
}

impl AnalysisReport {
    pub fn new(samples: &[f64], verdict: &Verdict) -> Self {
        Self {
            fault: verdict.fault,
            badge: verdict.fault.as_str().to_uppercase(),
            is_fault: verdict.is_fault(),
            confidence_bars: confidence_bars(verdict),
            features: verdict.features.clone(),
            feature_tiles: feature_tiles(&verdict.features),
            chart: downsample(samples, RenderStyle::Animated),
            sample_count: samples.len(),
        }
    }
}

/// Classify `samples` once.
pub async fn analyze<C: Classifier>(
    classifier: &C,
    samples: &[f64],
) -> Result<AnalysisReport, ClassificationError> {
    log::info!("One-shot analysis of {} samples", samples.len());
    let verdict = classifier.classify(samples).await?;
    log::info!("One-shot analysis result: {}", verdict.fault);
    Ok(AnalysisReport::new(samples, &verdict))
}

/// Message shown when an analysis fails. The classifier's own rejection
/// text is passed through; transport problems get a connection hint.
pub fn failure_message(error: &ClassificationError) -> String {
    match error {
        ClassificationError::Rejected(message) => message.clone(),
        other => format!("Failed to connect to the classifier API ({})", other),
    }
}

/// Demo waveform of the requested shape for the "test sample" flow.
pub fn generate_test_sample(fault: FaultType) -> SampleSequence {
    Synthesizer::default().generate_now(fault)
}

fn feature_tiles(features: &FeatureSummary) -> Vec<FeatureTile> {
    let mut tiles = vec![
        FeatureTile {
            name: "Num Spikes",
            value: features.num_peaks.to_string(),
        },
        FeatureTile {
            name: "Peak Height",
            value: format!("{:.3}", features.max_peak_height),
        },
        FeatureTile {
            name: "Mean",
            value: format!("{:.3}", features.mean),
        },
        FeatureTile {
            name: "Std Dev",
            value: format!("{:.3}", features.std),
        },
        FeatureTile {
            name: "Plateau Dur.",
            value: features.plateau_duration.to_string(),
        },
        FeatureTile {
            name: "Max Slope",
            value: format!("{:.4}", features.max_slope),
        },
    ];

    if let Some(min_slope) = features.min_slope {
        tiles.push(FeatureTile {
            name: "Min Slope",
            value: format!("{:.4}", min_slope),
        });
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fault_state::tests::verdict;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OneShot {
        outcome: Result<Verdict, ClassificationError>,
        seen: AtomicUsize,
    }

    impl Classifier for OneShot {
        async fn classify(&self, samples: &[f64]) -> Result<Verdict, ClassificationError> {
            self.seen.store(samples.len(), Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[tokio::test]
    async fn test_analyze_builds_report() {
        let mut v = verdict(FaultType::Spike, 91.5);
        v.features.min_slope = Some(-0.12346);
        let classifier = OneShot {
            outcome: Ok(v),
            seen: AtomicUsize::new(0),
        };
        let samples = generate_test_sample(FaultType::Spike);

        let report = analyze(&classifier, &samples).await.unwrap();
        assert_eq!(classifier.seen.load(Ordering::SeqCst), 1000);
        assert_eq!(report.badge, "SPIKE");
        assert!(report.is_fault);
        assert_eq!(report.sample_count, 1000);
        assert_eq!(report.chart.len(), 100);
        assert!(report.chart.animate);
        assert_eq!(report.confidence_bars.len(), 4);

        let tiles: Vec<(&str, &str)> = report
            .feature_tiles
            .iter()
            .map(|t| (t.name, t.value.as_str()))
            .collect();
        assert_eq!(
            tiles,
            vec![
                ("Num Spikes", "1"),
                ("Peak Height", "0.900"),
                ("Mean", "0.400"),
                ("Std Dev", "0.100"),
                ("Plateau Dur.", "12"),
                ("Max Slope", "0.0500"),
                ("Min Slope", "-0.1235"),
            ]
        );
    }

    #[tokio::test]
    async fn test_analyze_normal_has_six_tiles() {
        let classifier = OneShot {
            outcome: Ok(verdict(FaultType::Normal, 99.0)),
            seen: AtomicUsize::new(0),
        };
        let report = analyze(&classifier, &[2.5; 20]).await.unwrap();
        assert!(!report.is_fault);
        assert_eq!(report.badge, "NORMAL");
        assert_eq!(report.feature_tiles.len(), 6);
        assert_eq!(report.chart.len(), 20);
    }

    #[tokio::test]
    async fn test_analyze_propagates_failure() {
        let classifier = OneShot {
            outcome: Err(ClassificationError::Rejected("Waveform too short".to_string())),
            seen: AtomicUsize::new(0),
        };
        let err = analyze(&classifier, &[1.0; 10]).await.unwrap_err();
        assert_eq!(failure_message(&err), "Waveform too short");
    }

    #[test]
    fn test_failure_message_for_transport_errors() {
        let message = failure_message(&ClassificationError::Timeout);
        assert!(message.starts_with("Failed to connect to the classifier API"));
        assert!(message.contains("timed out"));
    }

    #[test]
    fn test_generated_sample_has_requested_shape() {
        let plateau = generate_test_sample(FaultType::Plateau);
        assert_eq!(plateau.len(), 1000);
        assert!(plateau[620] > 4.0);
        assert!(plateau[100] < 3.0);
    }
}
