//! Patch (tone) model.
//!
//! A patch carries the register-visible parameter values of one sound:
//! eleven fields per operator, the channel-level topology fields, the noise
//! setup and the pan mode. The dispatcher consults `noise.enabled` on every
//! note-on to decide noise-priority allocation, and `pan_mode` to pick the
//! placement path.

use serde::{Deserialize, Serialize};

use crate::pan::PanPosition;
use ottavo_chip::{ChannelParam, OperatorParam};

/// Parameter values for one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorPatch {
    pub attack_rate: u8,
    pub decay1_rate: u8,
    pub decay2_rate: u8,
    pub release_rate: u8,
    pub sustain_level: u8,
    pub total_level: u8,
    pub key_scale: u8,
    pub multiple: u8,
    pub detune1: u8,
    pub detune2: u8,
    pub ams_enable: u8,
}

impl OperatorPatch {
    /// A silent carrier-style operator.
    pub const fn muted() -> Self {
        Self {
            attack_rate: 31,
            decay1_rate: 0,
            decay2_rate: 0,
            release_rate: 15,
            sustain_level: 0,
            total_level: 127,
            key_scale: 0,
            multiple: 1,
            detune1: 0,
            detune2: 0,
            ams_enable: 0,
        }
    }

    /// Raw value of one field.
    pub fn value(&self, kind: OperatorParam) -> u8 {
        match kind {
            OperatorParam::AttackRate => self.attack_rate,
            OperatorParam::Decay1Rate => self.decay1_rate,
            OperatorParam::Decay2Rate => self.decay2_rate,
            OperatorParam::ReleaseRate => self.release_rate,
            OperatorParam::SustainLevel => self.sustain_level,
            OperatorParam::TotalLevel => self.total_level,
            OperatorParam::KeyScale => self.key_scale,
            OperatorParam::Multiple => self.multiple,
            OperatorParam::Detune1 => self.detune1,
            OperatorParam::Detune2 => self.detune2,
            OperatorParam::AmsEnable => self.ams_enable,
        }
    }
}

/// Noise generator setup. Noise replaces the C2 oscillator of channel 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub enabled: bool,
    /// Noise frequency (0-31).
    pub frequency: u8,
}

/// How note-ons place channels in the stereo field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanMode {
    /// Every channel at the same fixed position.
    Fixed(PanPosition),
    /// A fresh random placement per note-on.
    Random,
}

impl Default for PanMode {
    fn default() -> Self {
        PanMode::Fixed(PanPosition::Center)
    }
}

/// One complete sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub name: String,
    pub ops: [OperatorPatch; 4],
    /// Operator connection topology (0-7).
    pub algorithm: u8,
    /// M1 self-feedback (0-7).
    pub feedback: u8,
    /// Amplitude modulation sensitivity (0-3).
    pub ams: u8,
    /// Phase modulation sensitivity (0-7).
    pub pms: u8,
    pub noise: NoiseConfig,
    pub pan_mode: PanMode,
}

impl Patch {
    /// Raw value of a channel-level field.
    ///
    /// `Pan` reports the fixed position, or center while in random mode
    /// (the per-note draw lives in the pan assigner, not the patch).
    pub fn channel_value(&self, kind: ChannelParam) -> u8 {
        match kind {
            ChannelParam::Algorithm => self.algorithm,
            ChannelParam::Feedback => self.feedback,
            ChannelParam::Ams => self.ams,
            ChannelParam::Pms => self.pms,
            ChannelParam::Pan => match self.pan_mode {
                PanMode::Fixed(position) => position.raw(),
                PanMode::Random => PanPosition::Center.raw(),
            },
        }
    }
}

impl Default for Patch {
    /// A plain two-operator FM keys sound: M1 modulating C2 at moderate
    /// index, quick decay to a held sustain.
    fn default() -> Self {
        let modulator = OperatorPatch {
            attack_rate: 31,
            decay1_rate: 12,
            decay2_rate: 4,
            release_rate: 8,
            sustain_level: 4,
            total_level: 45,
            key_scale: 1,
            multiple: 2,
            detune1: 3,
            detune2: 0,
            ams_enable: 0,
        };
        let carrier = OperatorPatch {
            attack_rate: 31,
            decay1_rate: 8,
            decay2_rate: 2,
            release_rate: 10,
            sustain_level: 2,
            total_level: 0,
            key_scale: 0,
            multiple: 1,
            detune1: 0,
            detune2: 0,
            ams_enable: 0,
        };

        Self {
            name: "Init Keys".into(),
            ops: [modulator, OperatorPatch::muted(), OperatorPatch::muted(), carrier],
            algorithm: 4,
            feedback: 3,
            ams: 0,
            pms: 0,
            noise: NoiseConfig::default(),
            pan_mode: PanMode::default(),
        }
    }
}
