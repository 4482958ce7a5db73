//! Shared test doubles.

use ottavo::chip::{ChipEngine, ChipKind};

/// Chip double that records the full call sequence.
#[derive(Debug, Default)]
pub struct RecordingChip {
    pub writes: Vec<(u8, u8)>,
    pub note_ons: Vec<(u8, u8, u8)>,
    pub note_offs: Vec<(u8, u8)>,
    pub initialized: Option<(ChipKind, f32)>,
    pub blocks_rendered: usize,
    pub resets: usize,
}

impl ChipEngine for RecordingChip {
    fn initialize(&mut self, kind: ChipKind, sample_rate: f32) {
        self.initialized = Some((kind, sample_rate));
    }

    fn write_register(&mut self, address: u8, value: u8) {
        self.writes.push((address, value));
    }

    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        self.note_ons.push((channel, note, velocity));
    }

    fn note_off(&mut self, channel: u8, note: u8) {
        self.note_offs.push((channel, note));
    }

    fn generate_samples(&mut self, left: &mut [f32], right: &mut [f32]) {
        left.fill(0.0);
        right.fill(0.0);
        self.blocks_rendered += 1;
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}
