//! Parameter field encoding.
//!
//! Every operator- and channel-level parameter of the chip is a bit field
//! inside one of the shared registers. This module centralizes the field
//! widths, positions and register blocks so no magic mask ever appears in
//! the dispatch code.
//!
//! `encode` validates against the documented maximum, then masks to the
//! field width either way: out-of-range input is a caller contract
//! violation, logged but never a panic; an audio thread must not halt
//! over a bad controller value.

use tracing::warn;

use crate::regs;

/// Operator-level parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorParam {
    /// Envelope attack rate (0-31).
    AttackRate,
    /// First decay rate, toward the sustain level (0-31).
    Decay1Rate,
    /// Second decay rate, after the sustain level (0-31).
    Decay2Rate,
    /// Release rate (0-15).
    ReleaseRate,
    /// Sustain level, the D1L knee (0-15).
    SustainLevel,
    /// Attenuation (0-127, larger is quieter).
    TotalLevel,
    /// Key scaling of envelope rates (0-3).
    KeyScale,
    /// Frequency multiplier (0-15).
    Multiple,
    /// Fine detune (0-7).
    Detune1,
    /// Coarse detune (0-3).
    Detune2,
    /// Amplitude modulation sensitivity enable (0-1).
    AmsEnable,
}

impl OperatorParam {
    /// All kinds, in patch order.
    pub const ALL: [OperatorParam; 11] = [
        OperatorParam::AttackRate,
        OperatorParam::Decay1Rate,
        OperatorParam::Decay2Rate,
        OperatorParam::ReleaseRate,
        OperatorParam::SustainLevel,
        OperatorParam::TotalLevel,
        OperatorParam::KeyScale,
        OperatorParam::Multiple,
        OperatorParam::Detune1,
        OperatorParam::Detune2,
        OperatorParam::AmsEnable,
    ];

    /// Documented maximum raw value for this kind.
    pub const fn max_value(self) -> u8 {
        match self {
            OperatorParam::AttackRate => 31,
            OperatorParam::Decay1Rate => 31,
            OperatorParam::Decay2Rate => 31,
            OperatorParam::ReleaseRate => 15,
            OperatorParam::SustainLevel => 15,
            OperatorParam::TotalLevel => 127,
            OperatorParam::KeyScale => 3,
            OperatorParam::Multiple => 15,
            OperatorParam::Detune1 => 7,
            OperatorParam::Detune2 => 3,
            OperatorParam::AmsEnable => 1,
        }
    }

    /// Field mask at bit position 0 (the field width).
    const fn mask(self) -> u8 {
        match self {
            OperatorParam::AttackRate
            | OperatorParam::Decay1Rate
            | OperatorParam::Decay2Rate => 0x1F,
            OperatorParam::ReleaseRate
            | OperatorParam::SustainLevel
            | OperatorParam::Multiple => 0x0F,
            OperatorParam::TotalLevel => 0x7F,
            OperatorParam::KeyScale | OperatorParam::Detune2 => 0x03,
            OperatorParam::Detune1 => 0x07,
            OperatorParam::AmsEnable => 0x01,
        }
    }

    /// Bit position of the field within its register.
    pub const fn shift(self) -> u8 {
        match self {
            OperatorParam::AttackRate
            | OperatorParam::Decay1Rate
            | OperatorParam::Decay2Rate
            | OperatorParam::ReleaseRate
            | OperatorParam::TotalLevel
            | OperatorParam::Multiple => 0,
            OperatorParam::SustainLevel | OperatorParam::Detune1 => 4,
            OperatorParam::KeyScale | OperatorParam::Detune2 => 6,
            OperatorParam::AmsEnable => 7,
        }
    }

    /// Base address of the register block this field lives in.
    pub const fn register_base(self) -> u8 {
        match self {
            OperatorParam::AttackRate | OperatorParam::KeyScale => regs::KS_AR,
            OperatorParam::Decay1Rate | OperatorParam::AmsEnable => regs::AMS_D1R,
            OperatorParam::Decay2Rate | OperatorParam::Detune2 => regs::DT2_D2R,
            OperatorParam::ReleaseRate | OperatorParam::SustainLevel => regs::D1L_RR,
            OperatorParam::TotalLevel => regs::TOTAL_LEVEL,
            OperatorParam::Multiple | OperatorParam::Detune1 => regs::DT1_MUL,
        }
    }

    /// Field mask shifted into register position.
    pub const fn register_mask(self) -> u8 {
        self.mask() << self.shift()
    }

    /// Validate and mask a raw value to this field's width.
    ///
    /// Out-of-range input is logged and masked, never rejected: the result
    /// is always a writable field value.
    pub fn encode(self, raw: u8) -> u8 {
        if raw > self.max_value() {
            warn!(kind = ?self, raw, max = self.max_value(), "operator parameter out of range");
        }
        raw & self.mask()
    }
}

/// Channel-level parameter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelParam {
    /// Operator connection topology (0-7).
    Algorithm,
    /// M1 self-feedback level (0-7).
    Feedback,
    /// Stereo output routing (0-3: off, right, left, center).
    Pan,
    /// Amplitude modulation sensitivity (0-3).
    Ams,
    /// Phase modulation sensitivity (0-7).
    Pms,
}

impl ChannelParam {
    /// All kinds, in patch order.
    pub const ALL: [ChannelParam; 5] = [
        ChannelParam::Algorithm,
        ChannelParam::Feedback,
        ChannelParam::Pan,
        ChannelParam::Ams,
        ChannelParam::Pms,
    ];

    /// Documented maximum raw value for this kind.
    pub const fn max_value(self) -> u8 {
        match self {
            ChannelParam::Algorithm => 7,
            ChannelParam::Feedback => 7,
            ChannelParam::Pan => 3,
            ChannelParam::Ams => 3,
            ChannelParam::Pms => 7,
        }
    }

    /// Bit position of the field within its register.
    pub const fn shift(self) -> u8 {
        match self {
            ChannelParam::Algorithm | ChannelParam::Ams => 0,
            ChannelParam::Feedback => 3,
            ChannelParam::Pms => 4,
            // Pan encodes straight to register position, see `encode`
            ChannelParam::Pan => 0,
        }
    }

    /// Base address of the register block this field lives in.
    pub const fn register_base(self) -> u8 {
        match self {
            ChannelParam::Algorithm | ChannelParam::Feedback | ChannelParam::Pan => {
                regs::RL_FB_CONNECT
            }
            ChannelParam::Ams | ChannelParam::Pms => regs::PMS_AMS,
        }
    }

    /// Field mask shifted into register position.
    pub const fn register_mask(self) -> u8 {
        match self {
            ChannelParam::Algorithm => 0x07,
            ChannelParam::Feedback => 0x07 << 3,
            ChannelParam::Pan => 0xC0,
            ChannelParam::Ams => 0x03,
            ChannelParam::Pms => 0x07 << 4,
        }
    }

    /// Validate and encode a raw value into register position.
    ///
    /// `Pan` does not follow the mask-and-shift pattern: its four raw values
    /// select fixed RL bit patterns, and right (1) deliberately precedes
    /// left (2). The hardware's bit layout is preserved exactly.
    pub fn encode(self, raw: u8) -> u8 {
        if raw > self.max_value() {
            warn!(kind = ?self, raw, max = self.max_value(), "channel parameter out of range");
        }
        match self {
            ChannelParam::Pan => match raw & 0x03 {
                0 => 0x00, // both outputs off
                1 => 0x80, // right only
                2 => 0x40, // left only
                _ => 0xC0, // center
            },
            ChannelParam::Algorithm => raw & 0x07,
            ChannelParam::Feedback => raw & 0x07,
            ChannelParam::Ams => raw & 0x03,
            ChannelParam::Pms => raw & 0x07,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_max_values() {
        assert_eq!(OperatorParam::AttackRate.max_value(), 31);
        assert_eq!(OperatorParam::ReleaseRate.max_value(), 15);
        assert_eq!(OperatorParam::TotalLevel.max_value(), 127);
        assert_eq!(OperatorParam::AmsEnable.max_value(), 1);
    }

    #[test]
    fn test_total_level_masks_to_seven_bits() {
        // 200 exceeds the documented max but must still come back masked
        let encoded = OperatorParam::TotalLevel.encode(200);
        assert_eq!(encoded, 200 & 0x7F);
        assert!(encoded <= 127);
        assert_eq!(OperatorParam::TotalLevel.encode(127), 127);
    }

    #[test]
    fn test_fields_fit_registers() {
        for kind in OperatorParam::ALL {
            let top = kind.encode(kind.max_value());
            assert_eq!(top, kind.max_value(), "{kind:?} max must survive masking");
            assert_eq!(
                (top << kind.shift()) & !kind.register_mask(),
                0,
                "{kind:?} spills outside its register mask"
            );
        }
    }

    #[test]
    fn test_shared_register_fields_disjoint() {
        // Fields that share a register block must not overlap
        let pairs = [
            (OperatorParam::AttackRate, OperatorParam::KeyScale),
            (OperatorParam::Decay1Rate, OperatorParam::AmsEnable),
            (OperatorParam::Decay2Rate, OperatorParam::Detune2),
            (OperatorParam::ReleaseRate, OperatorParam::SustainLevel),
            (OperatorParam::Multiple, OperatorParam::Detune1),
        ];
        for (a, b) in pairs {
            assert_eq!(a.register_base(), b.register_base());
            assert_eq!(a.register_mask() & b.register_mask(), 0, "{a:?}/{b:?}");
        }
    }

    #[test]
    fn test_pan_bit_patterns() {
        // The hardware order: off, right, left, center
        assert_eq!(ChannelParam::Pan.encode(0), 0x00);
        assert_eq!(ChannelParam::Pan.encode(1), 0x80);
        assert_eq!(ChannelParam::Pan.encode(2), 0x40);
        assert_eq!(ChannelParam::Pan.encode(3), 0xC0);
    }

    #[test]
    fn test_channel_register_layout() {
        assert_eq!(ChannelParam::Algorithm.register_base(), regs::RL_FB_CONNECT);
        assert_eq!(ChannelParam::Feedback.register_mask(), 0x38);
        assert_eq!(ChannelParam::Pms.register_mask(), 0x70);
        assert_eq!(
            ChannelParam::Algorithm.register_mask()
                & ChannelParam::Feedback.register_mask()
                & ChannelParam::Pan.register_mask(),
            0
        );
    }
}
