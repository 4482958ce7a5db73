//! Engine configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the synth engine.
///
/// Validated once at construction time; the audio thread never sees an
/// invalid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will ask for, in frames.
    pub max_block_size: usize,
    /// Pitch bend range in semitones (1-12).
    pub pitch_bend_range: f32,
    /// Automated parameters are applied to the chip at most once every
    /// this many blocks (a modulo counter, not time-based).
    pub param_update_interval: u32,
    /// Seed for the pan assigner's PRNG. Fixed seeds make the randomized
    /// pan mode reproducible in tests.
    pub pan_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            max_block_size: 1024,
            pitch_bend_range: 2.0,
            param_update_interval: 4,
            pan_seed: 0x6F74_7461_766F,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate < 8000.0 || self.sample_rate > 192_000.0 {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-192000 Hz)",
                self.sample_rate
            )));
        }
        if self.max_block_size == 0 || self.max_block_size > 8192 {
            return Err(Error::InvalidConfig(format!(
                "max_block_size {} out of range (1-8192)",
                self.max_block_size
            )));
        }
        if self.pitch_bend_range < 1.0 || self.pitch_bend_range > 12.0 {
            return Err(Error::InvalidConfig(format!(
                "pitch_bend_range {} out of range (1-12 semitones)",
                self.pitch_bend_range
            )));
        }
        if self.param_update_interval == 0 {
            return Err(Error::InvalidConfig(
                "param_update_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
