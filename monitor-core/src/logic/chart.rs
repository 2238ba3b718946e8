//! Chart Renderer - bounded-point view of the latest waveform.
//!
//! Keeps every `step`-th sample (step = ceil(len / 100)) labelled with its
//! original index. Each render replaces the whole dataset.

use serde::Serialize;

use crate::constants::MAX_DISPLAY_POINTS;

/// Dataset label shown in the chart legend
pub const SERIES_LABEL: &str = "Resistance (mOhm)";

/// How a render should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Continuous monitoring: no animation to avoid lag between ticks.
    Live,
    /// One-shot analysis: animate the transition.
    Animated,
}

/// Chart dataset as handed to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub series: &'static str,
    pub labels: Vec<usize>,
    pub values: Vec<f64>,
    pub animate: bool,
}

impl Default for ChartData {
    fn default() -> Self {
        Self {
            series: SERIES_LABEL,
            labels: Vec::new(),
            values: Vec::new(),
            animate: false,
        }
    }
}

impl ChartData {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Downsample `samples` to at most `MAX_DISPLAY_POINTS` points.
pub fn downsample(samples: &[f64], style: RenderStyle) -> ChartData {
    let step = samples.len().div_ceil(MAX_DISPLAY_POINTS).max(1);

    let (labels, values) = samples
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, v)| (i, *v))
        .unzip();

    ChartData {
        series: SERIES_LABEL,
        labels,
        values,
        animate: style == RenderStyle::Animated,
    }
}

/// Owner of the live chart's dataset.
#[derive(Debug, Default)]
pub struct ChartRenderer {
    data: ChartData,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dataset with a downsampled view of `samples`.
    pub fn render(&mut self, samples: &[f64], style: RenderStyle) {
        self.data = downsample(samples, style);
    }

    pub fn clear(&mut self) {
        self.data = ChartData::default();
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f64> {
        (0..len).map(|i| i as f64).collect()
    }

    #[test]
    fn test_thousand_samples_become_hundred_points() {
        let chart = downsample(&ramp(1000), RenderStyle::Live);
        assert_eq!(chart.len(), 100);
        assert_eq!(chart.labels[0], 0);
        assert_eq!(chart.labels[1], 10);
        assert_eq!(chart.labels[99], 990);
        assert_eq!(chart.values[99], 990.0);
        assert!(!chart.animate);
    }

    #[test]
    fn test_point_bound_and_strictly_increasing_labels() {
        for len in [1, 2, 37, 99, 100, 101, 199, 250, 999, 1001, 4321] {
            let chart = downsample(&ramp(len), RenderStyle::Live);
            assert!(chart.len() <= 100, "len {} gave {} points", len, chart.len());
            assert_eq!(chart.labels[0], 0);
            assert!(chart.labels.windows(2).all(|w| w[0] < w[1]));
            for (label, value) in chart.labels.iter().zip(&chart.values) {
                assert_eq!(*label as f64, *value);
            }
        }
    }

    #[test]
    fn test_short_sequences_are_kept_whole() {
        let chart = downsample(&[4.0, 5.0, 6.0], RenderStyle::Animated);
        assert_eq!(chart.labels, vec![0, 1, 2]);
        assert!(chart.animate);
    }

    #[test]
    fn test_step_rounds_up() {
        // 101 samples -> step 2 -> 51 points
        let chart = downsample(&ramp(101), RenderStyle::Live);
        assert_eq!(chart.len(), 51);
        assert_eq!(chart.labels[50], 100);
    }

    #[test]
    fn test_empty_input_renders_empty_chart() {
        assert!(downsample(&[], RenderStyle::Live).is_empty());
    }

    #[test]
    fn test_render_replaces_and_clear_empties() {
        let mut renderer = ChartRenderer::new();
        renderer.render(&ramp(500), RenderStyle::Live);
        assert_eq!(renderer.data().len(), 100);

        renderer.render(&ramp(20), RenderStyle::Live);
        assert_eq!(renderer.data().len(), 20);

        renderer.clear();
        assert!(renderer.data().is_empty());
    }
}
