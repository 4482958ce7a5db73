//! Per-channel stereo placement.
//!
//! The chip routes each channel to the left and/or right output through two
//! RL bits; this module owns the per-channel pan state and the randomized
//! placement mode. The PRNG is a private, seeded [`SmallRng`]: the component
//! stays thread-confined and fully reproducible under a fixed seed.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use ottavo_chip::{ChannelParam, NUM_CHANNELS};

/// Probability of re-rolling a random draw that repeats the channel's
/// current placement. One re-roll only: a repeat is still accepted 20 % of
/// the time, and the re-roll itself may repeat too. This bounds audibly
/// static pan without fully excluding runs.
const REROLL_PROBABILITY: f32 = 0.8;

/// Stereo placement of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanPosition {
    Left,
    Center,
    Right,
}

impl PanPosition {
    /// Interpret a normalized gain hint: 0.0 left, 0.5 center, 1.0 right.
    pub fn from_normalized(value: f32) -> Self {
        if value < 1.0 / 3.0 {
            PanPosition::Left
        } else if value > 2.0 / 3.0 {
            PanPosition::Right
        } else {
            PanPosition::Center
        }
    }

    /// Raw value in the chip's pan numbering (see [`ChannelParam::Pan`]).
    pub const fn raw(self) -> u8 {
        match self {
            PanPosition::Right => 1,
            PanPosition::Left => 2,
            PanPosition::Center => 3,
        }
    }

    /// RL bit pattern, ready to merge into the RL/FB/CONNECT register.
    #[inline]
    pub fn hardware_bits(self) -> u8 {
        ChannelParam::Pan.encode(self.raw())
    }
}

/// Owns pan state for all 8 channels.
///
/// State persists across notes on the same channel and is reset to center
/// on engine reset. The assigner computes and remembers placements; the
/// dispatcher merges the returned RL bits into the register space.
#[derive(Debug)]
pub struct PanAssigner {
    /// Hardware pan pattern per channel; doubles as the random-mode
    /// "last value" memory.
    state: [u8; NUM_CHANNELS],
    rng: SmallRng,
}

impl PanAssigner {
    pub fn new(seed: u64) -> Self {
        Self {
            state: [PanPosition::Center.hardware_bits(); NUM_CHANNELS],
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Fix a channel's placement. Returns the RL bits to write.
    pub fn apply_fixed(&mut self, channel: u8, position: PanPosition) -> u8 {
        debug_assert!((channel as usize) < NUM_CHANNELS);
        let bits = position.hardware_bits();
        self.state[channel as usize & 0x07] = bits;
        bits
    }

    /// Draw a fresh random placement for a channel. Returns the RL bits to
    /// write.
    ///
    /// A draw equal to the channel's current placement is re-rolled once
    /// with probability 0.8, so back-to-back repeats are rare but not
    /// impossible.
    pub fn apply_random(&mut self, channel: u8) -> u8 {
        debug_assert!((channel as usize) < NUM_CHANNELS);
        let current = self.state[channel as usize & 0x07];

        let mut draw = self.draw();
        if draw.hardware_bits() == current && self.rng.gen::<f32>() < REROLL_PROBABILITY {
            draw = self.draw();
        }

        let bits = draw.hardware_bits();
        self.state[channel as usize & 0x07] = bits;
        bits
    }

    /// One uniform draw over the three placements.
    fn draw(&mut self) -> PanPosition {
        match self.rng.gen_range(0..3u8) {
            0 => PanPosition::Left,
            1 => PanPosition::Center,
            _ => PanPosition::Right,
        }
    }

    /// Fix every channel's placement. Returns the RL bits written.
    pub fn apply_to_all(&mut self, position: PanPosition) -> u8 {
        let bits = position.hardware_bits();
        self.state = [bits; NUM_CHANNELS];
        bits
    }

    /// Stored pan byte for a channel (diagnostics and tests).
    #[inline]
    pub fn get_random_state(&self, channel: u8) -> u8 {
        self.state[channel as usize & 0x07]
    }

    /// Reset every channel to center.
    pub fn reset_random_state(&mut self) {
        self.state = [PanPosition::Center.hardware_bits(); NUM_CHANNELS];
    }
}
