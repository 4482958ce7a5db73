//! Builder for [`OttavoEngine`](crate::OttavoEngine).

use ottavo_chip::{ChipEngine, ChipKind};
use ottavo_core::EngineConfig;
use ottavo_synth::{Dispatcher, Patch, StealPolicy};

use crate::engine::OttavoEngine;
use crate::Result;

/// Validate-then-build constructor for the engine.
///
/// All knobs default sensibly; `build` validates the assembled
/// configuration before any audio object exists, so the audio thread never
/// meets an invalid setup.
pub struct OttavoEngineBuilder {
    config: EngineConfig,
    chip_kind: ChipKind,
    patch: Patch,
    policy: StealPolicy,
}

impl Default for OttavoEngineBuilder {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            chip_kind: ChipKind::default(),
            patch: Patch::default(),
            policy: StealPolicy::default(),
        }
    }
}

impl OttavoEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output sample rate in Hz.
    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Largest block the host will request, in frames.
    pub fn max_block_size(mut self, frames: usize) -> Self {
        self.config.max_block_size = frames;
        self
    }

    /// Pitch bend range in semitones (1-12).
    pub fn pitch_bend_range(mut self, semitones: f32) -> Self {
        self.config.pitch_bend_range = semitones;
        self
    }

    /// Apply automated parameters every `blocks` blocks.
    pub fn param_update_interval(mut self, blocks: u32) -> Self {
        self.config.param_update_interval = blocks;
        self
    }

    /// Seed for the randomized pan mode.
    pub fn pan_seed(mut self, seed: u64) -> Self {
        self.config.pan_seed = seed;
        self
    }

    /// Which chip of the family to drive.
    pub fn chip_kind(mut self, kind: ChipKind) -> Self {
        self.chip_kind = kind;
        self
    }

    /// Initial patch.
    pub fn patch(mut self, patch: Patch) -> Self {
        self.patch = patch;
        self
    }

    /// Initial voice stealing policy.
    pub fn stealing_policy(mut self, policy: StealPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Full configuration in one go.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the configuration and assemble the engine around `chip`.
    pub fn build<C: ChipEngine>(self, chip: C) -> Result<OttavoEngine<C>> {
        self.config.validate()?;

        let mut dispatcher = Dispatcher::new(chip, self.chip_kind, self.patch, &self.config);
        dispatcher.set_stealing_policy(self.policy);

        Ok(OttavoEngine::from_parts(dispatcher, self.config.max_block_size))
    }
}
