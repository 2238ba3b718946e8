//! Waveform acquisition: synthetic generator, hardware stream client and
//! the per-tick source that chooses between them.

pub mod hardware;
pub mod source;
pub mod synthetic;

pub use hardware::{HardwareFeed, StreamClient, StreamConfig};
pub use source::{Acquisition, SimulationType, WaveformOrigin, WaveformSource};
pub use synthetic::Synthesizer;
