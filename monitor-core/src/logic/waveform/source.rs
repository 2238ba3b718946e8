//! Waveform Source - one sample sequence per tick.
//!
//! Demo mode synthesizes; hardware mode reads the sensor stream and falls
//! back to a synthetic "normal" waveform when the stream has nothing.
//! `acquire` never fails.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hardware::HardwareFeed;
use super::synthetic::Synthesizer;
use crate::logic::types::{AcquisitionMode, FaultType, SampleSequence};

/// Demo-mode shape selector; `Random` picks a shape per acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationType {
    #[default]
    Normal,
    Spike,
    Plateau,
    Unstable,
    Random,
}

impl SimulationType {
    /// Resolve to a concrete shape.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> FaultType {
        match self {
            SimulationType::Normal => FaultType::Normal,
            SimulationType::Spike => FaultType::Spike,
            SimulationType::Plateau => FaultType::Plateau,
            SimulationType::Unstable => FaultType::Unstable,
            SimulationType::Random => FaultType::ALL[rng.gen_range(0..FaultType::ALL.len())],
        }
    }
}

impl From<FaultType> for SimulationType {
    fn from(fault: FaultType) -> Self {
        match fault {
            FaultType::Normal => SimulationType::Normal,
            FaultType::Spike => SimulationType::Spike,
            FaultType::Plateau => SimulationType::Plateau,
            FaultType::Unstable => SimulationType::Unstable,
        }
    }
}

/// Where a tick's waveform actually came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaveformOrigin {
    Synthetic { shape: FaultType },
    Hardware,
    /// Hardware was requested but unavailable; a synthetic normal waveform
    /// stands in.
    Fallback { reason: String },
}

/// One tick's acquisition result.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub samples: SampleSequence,
    pub origin: WaveformOrigin,
}

impl Acquisition {
    pub fn is_degraded(&self) -> bool {
        matches!(self.origin, WaveformOrigin::Fallback { .. })
    }
}

/// Demo synthesizer plus hardware feed behind one `acquire` call.
pub struct WaveformSource<H> {
    hardware: H,
    synthesizer: Synthesizer,
}

impl<H: HardwareFeed> WaveformSource<H> {
    pub fn new(hardware: H) -> Self {
        Self {
            hardware,
            synthesizer: Synthesizer::default(),
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: Synthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Produce the waveform for one tick.
    pub async fn acquire(&self, mode: AcquisitionMode, hint: SimulationType) -> Acquisition {
        match mode {
            AcquisitionMode::Demo => self.synthesize(hint),
            AcquisitionMode::Hardware => match self.hardware.fetch().await {
                Ok(samples) => Acquisition {
                    samples,
                    origin: WaveformOrigin::Hardware,
                },
                Err(e) => {
                    log::warn!("Hardware data unavailable ({}), using demo data", e);
                    Acquisition {
                        samples: self.synthesizer.generate_now(FaultType::Normal),
                        origin: WaveformOrigin::Fallback {
                            reason: e.to_string(),
                        },
                    }
                }
            },
        }
    }

    /// Synthesize without touching the hardware feed.
    pub fn synthesize(&self, hint: SimulationType) -> Acquisition {
        let mut rng = rand::thread_rng();
        let shape = hint.resolve(&mut rng);
        Acquisition {
            samples: self.synthesizer.generate(shape, &mut rng),
            origin: WaveformOrigin::Synthetic { shape },
        }
    }
}
