//! Controller-to-parameter routing.
//!
//! A static 128-entry table maps MIDI controller numbers to automatable
//! parameter targets. It is built once at startup and read-only afterward.
//! The per-channel pan controllers (CC 16-23) are deliberately *not* table
//! entries: they address a parallel per-channel array, so the dispatcher
//! resolves them with plain index arithmetic.

use crate::error::{Error, Result};
use ottavo_chip::{ChannelParam, OperatorParam, NUM_OPERATORS};

/// First controller of the contiguous per-channel pan block.
pub const PAN_CC_FIRST: u8 = 16;

/// Last controller of the per-channel pan block (`PAN_CC_FIRST + 7`).
pub const PAN_CC_LAST: u8 = 23;

/// An automatable parameter destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamTarget {
    /// An operator-level field on one of the four operators. Applies to
    /// that operator on all 8 channels (the patch is global).
    Operator(u8, OperatorParam),
    /// A channel-level field, applied to all 8 channels.
    Channel(ChannelParam),
    /// Noise generator frequency (0-31).
    NoiseFrequency,
    /// Pitch bend range in semitones (1-12).
    PitchBendRange,
}

impl ParamTarget {
    /// Total number of distinct targets.
    pub const COUNT: usize = NUM_OPERATORS * OperatorParam::ALL.len() + ChannelParam::ALL.len() + 2;

    /// Dense index for the lock-free parameter slots.
    pub fn index(self) -> usize {
        const OPS: usize = OperatorParam::ALL.len();
        match self {
            ParamTarget::Operator(op, kind) => {
                let kind_idx = OperatorParam::ALL
                    .iter()
                    .position(|k| *k == kind)
                    .expect("kind in ALL");
                op as usize * OPS + kind_idx
            }
            ParamTarget::Channel(kind) => {
                let kind_idx = ChannelParam::ALL
                    .iter()
                    .position(|k| *k == kind)
                    .expect("kind in ALL");
                NUM_OPERATORS * OPS + kind_idx
            }
            ParamTarget::NoiseFrequency => Self::COUNT - 2,
            ParamTarget::PitchBendRange => Self::COUNT - 1,
        }
    }

    /// Inverse of [`index`](Self::index).
    pub fn from_index(index: usize) -> Option<ParamTarget> {
        const OPS: usize = OperatorParam::ALL.len();
        const CHANNEL_START: usize = NUM_OPERATORS * OPS;
        const CHANNEL_END: usize = CHANNEL_START + ChannelParam::ALL.len();

        match index {
            i if i < CHANNEL_START => Some(ParamTarget::Operator(
                (i / OPS) as u8,
                OperatorParam::ALL[i % OPS],
            )),
            i if i < CHANNEL_END => Some(ParamTarget::Channel(ChannelParam::ALL[i - CHANNEL_START])),
            i if i == Self::COUNT - 2 => Some(ParamTarget::NoiseFrequency),
            i if i == Self::COUNT - 1 => Some(ParamTarget::PitchBendRange),
            _ => None,
        }
    }
}

/// Static CC-to-parameter route table.
#[derive(Debug, Clone)]
pub struct CcRouteTable {
    routes: [Option<ParamTarget>; 128],
}

impl CcRouteTable {
    /// Empty table: every controller unmapped.
    pub fn empty() -> Self {
        Self {
            routes: [None; 128],
        }
    }

    /// The default layout.
    ///
    /// - CC 14/15: algorithm, feedback
    /// - CC 16-23: per-channel pan (outside the table, see module docs)
    /// - CC 24-63: operator fields in blocks of four (one CC per operator):
    ///   total level, attack, decay 1, decay 2, release, sustain level,
    ///   multiple, detune 1, detune 2, key scale
    /// - CC 70-73: per-operator AM sensitivity enable
    /// - CC 75/76: channel AMS / PMS
    /// - CC 77: noise frequency
    /// - CC 78: pitch bend range
    pub fn new() -> Self {
        let mut table = Self::empty();

        table.routes[14] = Some(ParamTarget::Channel(ChannelParam::Algorithm));
        table.routes[15] = Some(ParamTarget::Channel(ChannelParam::Feedback));

        let op_blocks: [(u8, OperatorParam); 10] = [
            (24, OperatorParam::TotalLevel),
            (28, OperatorParam::AttackRate),
            (32, OperatorParam::Decay1Rate),
            (36, OperatorParam::Decay2Rate),
            (40, OperatorParam::ReleaseRate),
            (44, OperatorParam::SustainLevel),
            (48, OperatorParam::Multiple),
            (52, OperatorParam::Detune1),
            (56, OperatorParam::Detune2),
            (60, OperatorParam::KeyScale),
        ];
        for (base, kind) in op_blocks {
            for op in 0..NUM_OPERATORS as u8 {
                table.routes[(base + op) as usize] = Some(ParamTarget::Operator(op, kind));
            }
        }

        for op in 0..NUM_OPERATORS as u8 {
            table.routes[(70 + op) as usize] =
                Some(ParamTarget::Operator(op, OperatorParam::AmsEnable));
        }

        table.routes[75] = Some(ParamTarget::Channel(ChannelParam::Ams));
        table.routes[76] = Some(ParamTarget::Channel(ChannelParam::Pms));
        table.routes[77] = Some(ParamTarget::NoiseFrequency);
        table.routes[78] = Some(ParamTarget::PitchBendRange);

        table
    }

    /// Target for a controller, if mapped.
    #[inline]
    pub fn lookup(&self, cc: u8) -> Option<ParamTarget> {
        self.routes[cc as usize & 0x7F]
    }

    /// Install a custom route. Rejects controllers inside the pan block,
    /// which is resolved by arithmetic and must stay unmapped.
    pub fn set_route(&mut self, cc: u8, target: ParamTarget) -> Result<()> {
        if cc > 127 {
            return Err(Error::InvalidRoute(format!("controller {cc} out of range")));
        }
        if (PAN_CC_FIRST..=PAN_CC_LAST).contains(&cc) {
            return Err(Error::InvalidRoute(format!(
                "controller {cc} is reserved for per-channel pan"
            )));
        }
        self.routes[cc as usize] = Some(target);
        Ok(())
    }
}

impl Default for CcRouteTable {
    fn default() -> Self {
        Self::new()
    }
}
