//! Hardware model of the emulated OPM-class FM sound chip.
//!
//! This crate owns every magic number of the chip's programming interface:
//!
//! - [`regs`]: the 256-byte register address map and address arithmetic
//! - [`RegisterFile`]: write-through cache of last-written register values
//! - [`freq`]: MIDI note / Hz → chip key-code conversion
//! - [`OperatorParam`] / [`ChannelParam`]: parameter field widths, positions
//!   and encoding
//! - [`ChipEngine`]: the trait the actual tone generator implements
//!
//! The tone generator itself (oscillators, envelopes, the noise LFSR) lives
//! behind [`ChipEngine`]; nothing in this crate produces audio.

pub mod regs;

mod regfile;
pub use regfile::RegisterFile;

pub mod freq;
pub use freq::{note_to_frequency_code, note_to_frequency_code_with_bend, note_to_hz, FrequencyCode};

mod fields;
pub use fields::{ChannelParam, OperatorParam};

mod engine;
pub use engine::{ChipEngine, ChipKind, NullChip};

/// Number of FM channels.
pub const NUM_CHANNELS: usize = 8;

/// Number of operators per channel.
pub const NUM_OPERATORS: usize = 4;

/// The only channel wired to the noise generator.
pub const NOISE_CHANNEL: u8 = 7;
