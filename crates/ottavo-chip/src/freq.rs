//! MIDI note and Hz to chip key-code conversion.
//!
//! The chip encodes pitch as a key code (KC: octave in bits 6-4, note in
//! bits 3-0) plus a key fraction (KF: 1/64 semitone steps in bits 7-2).
//! The note field uses a C#-based code table where every fourth value is
//! unused, so the 12 semitones C#..C map to codes 0-14.
//!
//! All functions here are pure and allocation-free; the same inputs always
//! produce the same code, which is what the dispatcher relies on when it
//! rewrites sustained voices during pitch bend.

/// Reference pitch for A4.
pub const A4_FREQ: f32 = 440.0;

/// MIDI note number for A4.
pub const A4_NOTE: u8 = 69;

/// Lowest pitch the chip can encode: KC 0x00 is C#1 (MIDI 25, ~34.65 Hz).
const BASE_NOTE: u8 = 25;

/// Hz clamp applied before encoding, to keep the code arithmetic in range.
const MIN_HZ: f32 = 20.0;
const MAX_HZ: f32 = 20_000.0;

/// Semitone range of the key code: 8 octaves.
const MAX_STEPS: u32 = 96 * 64 - 1;

/// Note codes for the 12 semitones starting at C#.
///
/// The hardware skips every fourth code (3, 7, 11, 15), a quirk of the
/// key-code adder.
const NOTE_CODE: [u8; 12] = [0, 1, 2, 4, 5, 6, 8, 9, 10, 12, 13, 14];

/// Chip-native pitch encoding: key code + key fraction.
///
/// `key_fraction` is stored pre-shifted into bits 7-2, ready to write to
/// the KF register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyCode {
    pub key_code: u8,
    pub key_fraction: u8,
}

/// MIDI note number to frequency in Hz, 12-TET with A4 = 440 Hz.
#[inline]
pub fn note_to_hz(note: u8) -> f32 {
    A4_FREQ * ((note as f32 - A4_NOTE as f32) / 12.0).exp2()
}

/// Encode a frequency in Hz as a chip key code.
///
/// The input is clamped to [20, 20000] Hz first; pitches below the chip's
/// lowest encodable note saturate at KC 0x00 and pitches above the top of
/// the 8-octave range saturate at the highest code.
pub fn hz_to_frequency_code(hz: f32) -> FrequencyCode {
    let hz = hz.clamp(MIN_HZ, MAX_HZ);
    let base_hz = note_to_hz(BASE_NOTE);

    // Distance above KC 0x00 in 1/64 semitone steps, rounded
    let semis = 12.0 * (hz / base_hz).log2();
    let steps = ((semis * 64.0).round().max(0.0) as u32).min(MAX_STEPS);

    let semitone = steps / 64;
    let octave = (semitone / 12) as u8;
    let note = (semitone % 12) as usize;
    let fraction = (steps % 64) as u8;

    FrequencyCode {
        key_code: (octave << 4) | NOTE_CODE[note],
        key_fraction: fraction << 2,
    }
}

/// Encode a MIDI note number as a chip key code.
#[inline]
pub fn note_to_frequency_code(note: u8) -> FrequencyCode {
    debug_assert!(note <= 127, "MIDI note out of range: {note}");
    hz_to_frequency_code(note_to_hz(note))
}

/// Encode a MIDI note number with a pitch bend offset in semitones.
///
/// `bend_semitones` is expected in [-12, +12]; larger offsets are not
/// rejected but will saturate against the Hz clamp.
#[inline]
pub fn note_to_frequency_code_with_bend(note: u8, bend_semitones: f32) -> FrequencyCode {
    debug_assert!(note <= 127, "MIDI note out of range: {note}");
    debug_assert!(
        (-12.0..=12.0).contains(&bend_semitones),
        "bend {bend_semitones} outside expected [-12, +12]"
    );
    hz_to_frequency_code(note_to_hz(note) * (bend_semitones / 12.0).exp2())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_note_to_hz_reference_pitches() {
        assert_relative_eq!(note_to_hz(69), 440.0, epsilon = 0.01);
        assert_relative_eq!(note_to_hz(60), 261.63, epsilon = 0.01);
        assert_relative_eq!(note_to_hz(81), 880.0, epsilon = 0.01);
    }

    #[test]
    fn test_a4_key_code() {
        // A4 sits 44 semitones above C#1: octave 3, note A (code 10)
        let code = note_to_frequency_code(69);
        assert_eq!(code.key_code, 0x3A);
        assert_eq!(code.key_fraction, 0);
    }

    #[test]
    fn test_note_code_table_vectors() {
        // C#1 is the origin
        assert_eq!(note_to_frequency_code(25).key_code, 0x00);
        // D1 is one semitone up
        assert_eq!(note_to_frequency_code(26).key_code, 0x01);
        // C4 is note code 14 (the C slot) in octave 2
        assert_eq!(note_to_frequency_code(60).key_code, 0x2E);
        // One octave above A4
        assert_eq!(note_to_frequency_code(81).key_code, 0x4A);
    }

    #[test]
    fn test_skipped_codes_never_produced() {
        for note in 0..=127u8 {
            let kc = note_to_frequency_code(note).key_code & 0x0F;
            assert!(kc != 3 && kc != 7 && kc != 11 && kc != 15, "note {note}");
        }
    }

    #[test]
    fn test_zero_bend_is_identity() {
        for note in [0u8, 25, 60, 69, 100, 127] {
            assert_eq!(
                note_to_frequency_code(note),
                note_to_frequency_code_with_bend(note, 0.0)
            );
        }
    }

    #[test]
    fn test_full_semitone_bend_matches_neighbor_note() {
        assert_eq!(
            note_to_frequency_code_with_bend(69, 1.0),
            note_to_frequency_code(70)
        );
        assert_eq!(
            note_to_frequency_code_with_bend(69, -2.0),
            note_to_frequency_code(67)
        );
    }

    #[test]
    fn test_half_semitone_bend_sets_fraction() {
        let code = note_to_frequency_code_with_bend(69, 0.5);
        assert_eq!(code.key_code, 0x3A);
        assert_eq!(code.key_fraction, 32 << 2);
    }

    #[test]
    fn test_low_notes_saturate_at_origin() {
        // MIDI 0 is ~8.2 Hz; clamped to 20 Hz, still below C#1
        let code = note_to_frequency_code(0);
        assert_eq!(code.key_code, 0x00);
        assert_eq!(code.key_fraction, 0);
    }

    #[test]
    fn test_high_notes_saturate_at_top() {
        let code = hz_to_frequency_code(20_000.0);
        assert_eq!(code.key_code, 0x7E);
        assert_eq!(code.key_fraction, 63 << 2);
    }

    #[test]
    fn test_codes_monotonic_over_midi_range() {
        let mut last = 0u32;
        for note in 25..=120u8 {
            let code = note_to_frequency_code(note);
            let octave = (code.key_code >> 4) as u32;
            let note_code = (code.key_code & 0x0F) as u32;
            let ordinal = (octave * 16 + note_code) * 64 + (code.key_fraction >> 2) as u32;
            assert!(ordinal > last || note == 25, "note {note} not increasing");
            last = ordinal;
        }
    }
}
