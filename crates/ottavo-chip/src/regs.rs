//! OPM register address map.
//!
//! The chip exposes a flat 256-byte register space:
//!
//! - `0x08`: key on/off (channel in bits 2-0, operator mask in bits 6-3)
//! - `0x0F`: noise enable (bit 7) and noise frequency (bits 4-0)
//! - `0x18`-`0x1B`: LFO frequency, depth and waveform
//! - `0x20`-`0x27`: per-channel RL (bits 7-6), feedback (5-3), connection (2-0)
//! - `0x28`-`0x2F`: per-channel key code (octave bits 6-4, note bits 3-0)
//! - `0x30`-`0x37`: per-channel key fraction (bits 7-2)
//! - `0x38`-`0x3F`: per-channel PMS (bits 6-4) and AMS (bits 1-0)
//! - `0x40`-`0xFF`: per-operator blocks of 32, addressed `base + slot + channel`

/// Key on/off register.
pub const KEY_ON: u8 = 0x08;

/// Noise enable / noise frequency register.
pub const NOISE: u8 = 0x0F;

/// LFO frequency register.
pub const LFO_FREQ: u8 = 0x18;

/// LFO phase/amplitude modulation depth register.
pub const LFO_DEPTH: u8 = 0x19;

/// Control output / LFO waveform register.
pub const LFO_WAVEFORM: u8 = 0x1B;

/// Base of the per-channel RL/feedback/connection block (`0x20 + channel`).
pub const RL_FB_CONNECT: u8 = 0x20;

/// Base of the per-channel key code block (`0x28 + channel`).
pub const KEY_CODE: u8 = 0x28;

/// Base of the per-channel key fraction block (`0x30 + channel`).
pub const KEY_FRACTION: u8 = 0x30;

/// Base of the per-channel PMS/AMS block (`0x38 + channel`).
pub const PMS_AMS: u8 = 0x38;

/// Base of the per-operator detune-1/multiple block.
pub const DT1_MUL: u8 = 0x40;

/// Base of the per-operator total level block.
pub const TOTAL_LEVEL: u8 = 0x60;

/// Base of the per-operator key scale/attack rate block.
pub const KS_AR: u8 = 0x80;

/// Base of the per-operator AMS-enable/first decay rate block.
pub const AMS_D1R: u8 = 0xA0;

/// Base of the per-operator detune-2/second decay rate block.
pub const DT2_D2R: u8 = 0xC0;

/// Base of the per-operator sustain level/release rate block.
pub const D1L_RR: u8 = 0xE0;

/// Register slot offsets for the four operators of a channel.
///
/// The hardware orders operator slots M1, M2, C1, C2 within each 32-byte
/// block, so logical operators 0-3 (M1, C1, M2, C2) land at slot offsets
/// 0, 16, 8, 24.
const SLOT_OFFSET: [u8; 4] = [0, 16, 8, 24];

/// Address of an operator-level register.
///
/// `base` is one of the per-operator block bases ([`DT1_MUL`],
/// [`TOTAL_LEVEL`], ...), `channel` is 0-7, `op` is the logical operator
/// index 0-3 (M1, C1, M2, C2).
#[inline]
pub const fn operator_register(base: u8, channel: u8, op: usize) -> u8 {
    base + SLOT_OFFSET[op] + (channel & 0x07)
}

/// Address of a channel-level register.
///
/// `base` is one of the per-channel block bases ([`RL_FB_CONNECT`],
/// [`KEY_CODE`], ...), `channel` is 0-7.
#[inline]
pub const fn channel_register(base: u8, channel: u8) -> u8 {
    base + (channel & 0x07)
}

/// Key-on register value: operator mask in bits 6-3, channel in bits 2-0.
///
/// `op_mask` bit 0 = M1, bit 1 = C1, bit 2 = M2, bit 3 = C2. All four
/// operators keyed is `0x0F`; zero releases the channel.
#[inline]
pub const fn key_on_value(channel: u8, op_mask: u8) -> u8 {
    ((op_mask & 0x0F) << 3) | (channel & 0x07)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_register_addresses() {
        assert_eq!(channel_register(KEY_CODE, 0), 0x28);
        assert_eq!(channel_register(KEY_CODE, 7), 0x2F);
        assert_eq!(channel_register(KEY_FRACTION, 3), 0x33);
        assert_eq!(channel_register(RL_FB_CONNECT, 5), 0x25);
    }

    #[test]
    fn test_operator_slot_ordering() {
        // Logical M1, C1, M2, C2 land at slot offsets 0, 16, 8, 24
        assert_eq!(operator_register(TOTAL_LEVEL, 0, 0), 0x60);
        assert_eq!(operator_register(TOTAL_LEVEL, 0, 1), 0x70);
        assert_eq!(operator_register(TOTAL_LEVEL, 0, 2), 0x68);
        assert_eq!(operator_register(TOTAL_LEVEL, 0, 3), 0x78);
        assert_eq!(operator_register(DT1_MUL, 2, 3), 0x40 + 24 + 2);
    }

    #[test]
    fn test_operator_blocks_do_not_collide() {
        let mut seen = [false; 256];
        for op in 0..4 {
            for ch in 0..8u8 {
                let addr = operator_register(KS_AR, ch, op) as usize;
                assert!(!seen[addr], "duplicate address {addr:#04x}");
                seen[addr] = true;
            }
        }
        // Exactly the 32 addresses 0x80-0x9F
        assert_eq!(seen.iter().filter(|s| **s).count(), 32);
        assert!(seen[0x80] && seen[0x9F]);
    }

    #[test]
    fn test_key_on_value() {
        assert_eq!(key_on_value(0, 0x0F), 0x78);
        assert_eq!(key_on_value(7, 0x0F), 0x7F);
        assert_eq!(key_on_value(3, 0x00), 0x03);
    }
}
