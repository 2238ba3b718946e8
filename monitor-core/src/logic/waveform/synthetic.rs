//! Synthetic DCRM waveform generator (demo mode).
//!
//! Smooth sinusoidal baseline plus one fault-shaped perturbation injected
//! over a fixed index window, plus uniform noise on every sample.

use rand::Rng;
use std::f64::consts::PI;

use crate::constants::{
    BASELINE_AMPLITUDE, BASELINE_CENTER, BASELINE_PERIOD, NOISE_HALF_WIDTH, PLATEAU_OFFSET,
    PLATEAU_WINDOW, SPIKE_SLOPE, SPIKE_WINDOW, SYNTHETIC_SAMPLES, TIME_STEP, UNSTABLE_AMPLITUDE,
    UNSTABLE_WINDOW,
};
use crate::logic::types::{FaultType, SampleSequence};

/// Generator parameters. `Default` is the dashboard's demo shape.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    pub samples: usize,
    pub noise_half_width: f64,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self {
            samples: SYNTHETIC_SAMPLES,
            noise_half_width: NOISE_HALF_WIDTH,
        }
    }
}

impl Synthesizer {
    /// Noise-free generator, used to inspect the injected shapes.
    pub fn noiseless() -> Self {
        Self {
            noise_half_width: 0.0,
            ..Default::default()
        }
    }

    /// Generate one waveform shaped like `fault`.
    pub fn generate<R: Rng + ?Sized>(&self, fault: FaultType, rng: &mut R) -> SampleSequence {
        let samples = (0..self.samples)
            .map(|i| {
                let mut value = baseline(i) + perturbation(fault, i);
                if self.noise_half_width > 0.0 {
                    value += rng.gen_range(-self.noise_half_width..self.noise_half_width);
                }
                value
            })
            .collect::<Vec<f64>>();

        SampleSequence::new(samples)
    }

    /// Generate with the thread-local RNG. The RNG handle
    /// must not live across an await point.
    pub fn generate_now(&self, fault: FaultType) -> SampleSequence {
        self.generate(fault, &mut rand::thread_rng())
    }
}

/// Baseline resistance at sample `i`.
pub fn baseline(i: usize) -> f64 {
    let t = i as f64 * TIME_STEP;
    BASELINE_CENTER + BASELINE_AMPLITUDE * (2.0 * PI * t / BASELINE_PERIOD).sin()
}

/// Fault-specific offset at sample `i` (zero outside the fault window).
pub fn perturbation(fault: FaultType, i: usize) -> f64 {
    match fault {
        FaultType::Spike if in_window(SPIKE_WINDOW, i) => {
            (i - SPIKE_WINDOW.0) as f64 * SPIKE_SLOPE
        }
        FaultType::Plateau if in_window(PLATEAU_WINDOW, i) => PLATEAU_OFFSET,
        FaultType::Unstable if in_window(UNSTABLE_WINDOW, i) => {
            let width = (UNSTABLE_WINDOW.1 - UNSTABLE_WINDOW.0) as f64;
            UNSTABLE_AMPLITUDE * (8.0 * PI * (i - UNSTABLE_WINDOW.0) as f64 / width).sin()
        }
        _ => 0.0,
    }
}

fn in_window((start, end): (usize, usize), i: usize) -> bool {
    i >= start && i < end
}
