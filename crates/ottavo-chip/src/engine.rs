//! The chip engine seam.
//!
//! The tone generator (oscillators, envelopes, noise LFSR) is a separate
//! concern consumed through [`ChipEngine`]. The synth layer drives it with
//! register writes and note events and pulls rendered audio out once per
//! block; it never reaches around the trait.

/// Which chip of the OPM family to emulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChipKind {
    /// YM2151-class: 8 channels, 4 operators, noise on the last channel.
    #[default]
    Opm,
    /// OPZ-class variant with the same register interface.
    Opz,
}

/// Interface to the emulated tone generator.
///
/// Implementations must be RT-safe: `write_register`, `note_on`, `note_off`
/// and `generate_samples` run on the audio thread every block.
pub trait ChipEngine {
    /// Prepare the chip for a sample rate. Called once before processing
    /// and again whenever the host renegotiates the stream.
    fn initialize(&mut self, kind: ChipKind, sample_rate: f32);

    /// Write one register. The synth layer mirrors every write in its
    /// [`RegisterFile`](crate::RegisterFile); bypassing that mirror
    /// desynchronizes the two and is a contract violation.
    fn write_register(&mut self, address: u8, value: u8);

    /// Key a channel on.
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8);

    /// Release a channel.
    fn note_off(&mut self, channel: u8, note: u8);

    /// Render one block of stereo audio. `left` and `right` are the same
    /// length.
    fn generate_samples(&mut self, left: &mut [f32], right: &mut [f32]);

    /// Return the chip to power-on state.
    fn reset(&mut self);
}

/// A chip that swallows everything and renders silence.
///
/// Useful for benchmarks and for running the dispatch layer without a tone
/// generator attached.
#[derive(Debug, Default, Clone)]
pub struct NullChip;

impl ChipEngine for NullChip {
    fn initialize(&mut self, _kind: ChipKind, _sample_rate: f32) {}

    fn write_register(&mut self, _address: u8, _value: u8) {}

    fn note_on(&mut self, _channel: u8, _note: u8, _velocity: u8) {}

    fn note_off(&mut self, _channel: u8, _note: u8) {}

    fn generate_samples(&mut self, left: &mut [f32], right: &mut [f32]) {
        left.fill(0.0);
        right.fill(0.0);
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_chip_renders_silence() {
        let mut chip = NullChip;
        chip.initialize(ChipKind::Opm, 44100.0);
        let mut left = [1.0f32; 64];
        let mut right = [-1.0f32; 64];
        chip.generate_samples(&mut left, &mut right);
        assert!(left.iter().all(|s| *s == 0.0));
        assert!(right.iter().all(|s| *s == 0.0));
    }
}
